use std::{env, fs, path::PathBuf, time::Instant};

use perspective_assist::assistant::{PerspectiveAssistantParams, RulerAssistantParams};
use perspective_assist::grid::GridDrawParams;
use perspective_assist::{
    Assistant, AssistantKind, Homography, PerspectiveAssistant, PerspectiveGridGraph, Point2,
    RulerAssistant, Side, SubGridCell,
};
use serde::{Deserialize, Serialize};

/// Configuration for the stroke demo, loaded from JSON.
#[derive(Debug, Deserialize)]
struct DemoConfig {
    #[serde(default)]
    to_widget: WidgetTransform,
    assistants: Vec<AssistantConfig>,
    #[serde(default)]
    grid: Option<GridConfig>,
    strokes: Vec<StrokeConfig>,
    /// Where to write the report; stdout when absent.
    #[serde(default)]
    output_path: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
struct WidgetTransform {
    scale: f64,
    tx: f64,
    ty: f64,
}

impl Default for WidgetTransform {
    fn default() -> Self {
        Self {
            scale: 1.0,
            tx: 0.0,
            ty: 0.0,
        }
    }
}

#[derive(Debug, Deserialize)]
struct AssistantConfig {
    kind: String,
    handles: Vec<[f64; 2]>,
    #[serde(default)]
    perspective: PerspectiveAssistantParams,
    #[serde(default)]
    ruler: RulerAssistantParams,
}

#[derive(Debug, Deserialize)]
struct GridConfig {
    /// `[top_left, top_right, bottom_left, bottom_right]`.
    first: [[f64; 2]; 4],
    /// Far corners of each cell appended to the right, top then bottom.
    #[serde(default)]
    grow_right: Vec<[[f64; 2]; 2]>,
    #[serde(default)]
    subdivisions: u32,
    #[serde(default)]
    draw: GridDrawParams,
}

#[derive(Debug, Deserialize)]
struct StrokeConfig {
    begin: [f64; 2],
    samples: Vec<[f64; 2]>,
}

#[derive(Debug, Serialize)]
struct StrokeReport {
    assistant: Option<usize>,
    distance_at_begin: Option<f64>,
    /// `None` where the assistant declined to snap.
    snapped: Vec<Option<[f64; 2]>>,
}

#[derive(Debug, Serialize)]
struct AssistantReport {
    id: &'static str,
    complete: bool,
    cache_segments: usize,
}

#[derive(Debug, Serialize)]
struct GridReport {
    cells: usize,
    vanishing_points: Vec<[[f64; 2]; 2]>,
    segments: usize,
}

#[derive(Debug, Serialize)]
struct DemoOutput {
    config_path: String,
    assistants: Vec<AssistantReport>,
    grid: Option<GridReport>,
    strokes: Vec<StrokeReport>,
    elapsed_us: u64,
}

fn point(p: [f64; 2]) -> Point2<f64> {
    Point2::new(p[0], p[1])
}

fn pair(p: Point2<f64>) -> [f64; 2] {
    [p.x, p.y]
}

fn build_assistant(cfg: AssistantConfig) -> Result<Assistant, Box<dyn std::error::Error>> {
    let mut assistant: Assistant = match AssistantKind::from_id(&cfg.kind)? {
        AssistantKind::Perspective => PerspectiveAssistant::new(cfg.perspective).into(),
        AssistantKind::Ruler => RulerAssistant::new(cfg.ruler).into(),
    };
    for h in cfg.handles {
        assistant.add_handle(point(h))?;
    }
    Ok(assistant)
}

fn build_grid(cfg: &GridConfig) -> Result<PerspectiveGridGraph, Box<dyn std::error::Error>> {
    let mut graph = PerspectiveGridGraph::new();
    let [tl, tr, bl, br] = cfg.first.map(|p| graph.add_node(point(p)));
    let mut id = graph.add_sub_grid(SubGridCell::new(tl, tr, bl, br))?;
    graph.set_subdivisions(id, cfg.subdivisions)?;
    for far in &cfg.grow_right {
        id = graph.extend(id, Side::Right, far.map(point))?;
    }
    Ok(graph)
}

/// Perspective assistants claim strokes that start inside them; otherwise
/// the first ruler takes it.
fn pick_assistant(assistants: &[Assistant], begin: Point2<f64>) -> Option<usize> {
    assistants
        .iter()
        .position(|a| a.contains(begin))
        .or_else(|| {
            assistants
                .iter()
                .position(|a| a.kind() == AssistantKind::Ruler && a.is_complete())
        })
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    #[cfg(feature = "tracing")]
    perspective_assist::core::init_tracing(false);
    #[cfg(not(feature = "tracing"))]
    perspective_assist::core::init_with_level(log::LevelFilter::Debug)?;

    let args: Vec<String> = env::args().collect();
    let config_path = args
        .get(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("testdata/stroke_demo.json"));

    let cfg: DemoConfig = {
        let raw = fs::read_to_string(&config_path)?;
        serde_json::from_str(&raw)?
    };

    let t0 = Instant::now();
    let to_widget =
        Homography::scale_translate(cfg.to_widget.scale, cfg.to_widget.tx, cfg.to_widget.ty);

    let mut assistants = cfg
        .assistants
        .into_iter()
        .map(build_assistant)
        .collect::<Result<Vec<_>, _>>()?;

    let grid = match &cfg.grid {
        Some(grid_cfg) => {
            let graph = build_grid(grid_cfg)?;
            let vanishing_points = graph
                .cells()
                .filter_map(|(id, _)| graph.vanishing_points(id))
                .map(|vp| [pair(vp.top_bottom), pair(vp.left_right)])
                .collect();
            Some(GridReport {
                cells: graph.len(),
                vanishing_points,
                segments: graph.draw(&to_widget, &grid_cfg.draw).len(),
            })
        }
        None => None,
    };

    let mut strokes = Vec::with_capacity(cfg.strokes.len());
    for stroke in &cfg.strokes {
        let begin = point(stroke.begin);
        let chosen = pick_assistant(&assistants, begin);
        let mut report = StrokeReport {
            assistant: chosen,
            distance_at_begin: None,
            snapped: Vec::with_capacity(stroke.samples.len()),
        };
        if let Some(assistant) = chosen.and_then(|i| assistants.get_mut(i)) {
            report.distance_at_begin = Some(assistant.distance(begin));
            for &s in &stroke.samples {
                report
                    .snapped
                    .push(assistant.adjust_position(point(s), begin).map(pair));
            }
            assistant.end_stroke();
        }
        log::info!(
            "stroke from {:?}: assistant {:?}, {} samples",
            stroke.begin,
            report.assistant,
            report.snapped.len()
        );
        strokes.push(report);
    }

    let output = DemoOutput {
        config_path: config_path.display().to_string(),
        assistants: assistants
            .iter()
            .map(|a| AssistantReport {
                id: a.id(),
                complete: a.is_complete(),
                cache_segments: a.draw_cache(&to_widget).len(),
            })
            .collect(),
        grid,
        strokes,
        elapsed_us: t0.elapsed().as_micros() as u64,
    };

    let json = serde_json::to_string_pretty(&output)?;
    match cfg.output_path {
        Some(path) => fs::write(path, json)?,
        None => println!("{json}"),
    }
    Ok(())
}

use std::path::PathBuf;

use tracing::{debug, info};

use crate::error::{AssemblyError, ReelError, Result};
use crate::filtergraph::graph::{FadeDirection, Filter, FilterGraph, FilterStage, Pad};
use crate::timeline::EditDecisionList;

/// Length of the fade applied to shots whose incoming transition is `fade`
pub const FADE_IN_SECONDS: f64 = 1.0;

/// Label of the concatenated output stream
pub const OUTPUT_LABEL: &str = "outv";

/// A filter graph together with the inputs it expects.
///
/// `inputs[i]` is encoder input `i`; graph pads refer to inputs by that
/// position, so the two must never be reordered independently.
#[derive(Debug, Clone)]
pub struct CompiledGraph {
    pub inputs: Vec<PathBuf>,
    pub graph: FilterGraph,
    pub output_label: String,

    /// Expected output length in seconds
    pub duration: f64,
}

impl CompiledGraph {
    /// The `-filter_complex` argument
    pub fn render(&self) -> String {
        self.graph.to_string()
    }

    /// The `-map` argument selecting the concatenated stream
    pub fn output_selector(&self) -> String {
        format!("[{}]", self.output_label)
    }
}

/// Compiles an EDL into per-shot effect stages feeding one concat stage
pub struct FilterGraphCompiler;

impl FilterGraphCompiler {
    pub fn compile(edl: &EditDecisionList) -> Result<CompiledGraph> {
        if edl.is_empty() {
            return Err(AssemblyError::EmptyTimeline {
                operation: "compile_filter_graph".to_string(),
            }
            .into());
        }

        let mut graph = FilterGraph::new();
        let mut inputs = Vec::with_capacity(edl.len());
        let mut segment_labels = Vec::with_capacity(edl.len());

        for (i, edit) in edl.timeline.iter().enumerate() {
            inputs.push(edit.file_path.clone());

            let filter = if edit.transitions.fades_in() {
                Filter::Fade {
                    direction: FadeDirection::In,
                    start: 0.0,
                    duration: FADE_IN_SECONDS,
                }
            } else {
                Filter::Copy
            };

            let label = format!("v{}", i);
            debug!("Input {}: {:?} -> {} [{}]", i, edit.file_path, filter, label);

            graph.push(FilterStage::new(vec![Pad::video(i)], filter, vec![label.clone()]));
            segment_labels.push(Pad::Label(label));
        }

        graph.push(FilterStage::new(
            segment_labels,
            Filter::Concat {
                segments: edl.len(),
                video: 1,
                audio: 0,
            },
            vec![OUTPUT_LABEL.to_string()],
        ));

        graph
            .check(inputs.len())
            .map_err(|reason| ReelError::generic(format!("compile_filter_graph: {}", reason)))?;

        info!("Filter graph compiled: {} inputs, {} stages", inputs.len(), graph.len());

        Ok(CompiledGraph {
            inputs,
            graph,
            output_label: OUTPUT_LABEL.to_string(),
            duration: edl.total_duration(),
        })
    }
}

use std::collections::HashSet;
use std::fmt;

/// Stream type selector on an encoder input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Video,
    Audio,
}

impl StreamKind {
    fn specifier(&self) -> &'static str {
        match self {
            StreamKind::Video => "v",
            StreamKind::Audio => "a",
        }
    }
}

/// A pad feeding a filter stage: either a stream of input file `index`,
/// or the labelled output of an earlier stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Pad {
    Input { index: usize, stream: StreamKind },
    Label(String),
}

impl Pad {
    pub fn video(index: usize) -> Self {
        Pad::Input { index, stream: StreamKind::Video }
    }

    pub fn label<S: Into<String>>(name: S) -> Self {
        Pad::Label(name.into())
    }
}

impl fmt::Display for Pad {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Pad::Input { index, stream } => write!(f, "[{}:{}]", index, stream.specifier()),
            Pad::Label(name) => write!(f, "[{}]", name),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeDirection {
    In,
    Out,
}

/// Filters the compiler knows how to emit
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Pass the stream through unchanged
    Copy,

    Fade {
        direction: FadeDirection,
        start: f64,
        duration: f64,
    },

    /// Join `segments` inputs end to end
    Concat {
        segments: usize,
        video: usize,
        audio: usize,
    },
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Copy => f.write_str("copy"),
            Filter::Fade { direction, start, duration } => {
                let kind = match direction {
                    FadeDirection::In => "in",
                    FadeDirection::Out => "out",
                };
                write!(f, "fade=t={}:st={}:d={}", kind, start, duration)
            }
            Filter::Concat { segments, video, audio } => {
                write!(f, "concat=n={}:v={}:a={}", segments, video, audio)
            }
        }
    }
}

/// One `[in...]filter[out...]` chain element
#[derive(Debug, Clone, PartialEq)]
pub struct FilterStage {
    pub inputs: Vec<Pad>,
    pub filter: Filter,
    pub outputs: Vec<String>,
}

impl FilterStage {
    pub fn new(inputs: Vec<Pad>, filter: Filter, outputs: Vec<String>) -> Self {
        Self { inputs, filter, outputs }
    }
}

impl fmt::Display for FilterStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for pad in &self.inputs {
            write!(f, "{}", pad)?;
        }
        write!(f, "{}", self.filter)?;
        for label in &self.outputs {
            write!(f, "[{}]", label)?;
        }
        Ok(())
    }
}

/// Ordered list of filter stages.
///
/// Rendering with `Display` gives the textual `-filter_complex` argument;
/// stages are separated by `;` in insertion order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterGraph {
    stages: Vec<FilterStage>,
}

impl FilterGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, stage: FilterStage) -> &mut Self {
        self.stages.push(stage);
        self
    }

    pub fn stages(&self) -> &[FilterStage] {
        &self.stages
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Distinct encoder inputs referenced by the graph
    pub fn input_indices(&self) -> Vec<usize> {
        let mut seen = HashSet::new();
        self.stages
            .iter()
            .flat_map(|stage| stage.inputs.iter())
            .filter_map(|pad| match pad {
                Pad::Input { index, .. } => Some(*index),
                Pad::Label(_) => None,
            })
            .filter(|index| seen.insert(*index))
            .collect()
    }

    /// Check that every label is produced once, before it is consumed, and
    /// that input indices stay below `input_count`. Returns a description of
    /// the first problem found.
    pub fn check(&self, input_count: usize) -> std::result::Result<(), String> {
        let mut produced: HashSet<&str> = HashSet::new();

        for (position, stage) in self.stages.iter().enumerate() {
            for pad in &stage.inputs {
                match pad {
                    Pad::Input { index, .. } if *index >= input_count => {
                        return Err(format!("stage {} reads input {} of {}", position, index, input_count));
                    }
                    Pad::Label(name) if !produced.contains(name.as_str()) => {
                        return Err(format!("stage {} reads [{}] before it is produced", position, name));
                    }
                    _ => {}
                }
            }
            for label in &stage.outputs {
                if !produced.insert(label.as_str()) {
                    return Err(format!("label [{}] is produced twice", label));
                }
            }
        }

        Ok(())
    }
}

impl fmt::Display for FilterGraph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, stage) in self.stages.iter().enumerate() {
            if i > 0 {
                f.write_str(";")?;
            }
            write!(f, "{}", stage)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_rendering() {
        let fade = FilterStage::new(
            vec![Pad::video(1)],
            Filter::Fade { direction: FadeDirection::In, start: 0.0, duration: 1.0 },
            vec!["v1".to_string()],
        );
        assert_eq!(fade.to_string(), "[1:v]fade=t=in:st=0:d=1[v1]");

        let fade_out = Filter::Fade { direction: FadeDirection::Out, start: 4.5, duration: 0.5 };
        assert_eq!(fade_out.to_string(), "fade=t=out:st=4.5:d=0.5");

        let concat = FilterStage::new(
            vec![Pad::label("v0"), Pad::label("v1")],
            Filter::Concat { segments: 2, video: 1, audio: 0 },
            vec!["outv".to_string()],
        );
        assert_eq!(concat.to_string(), "[v0][v1]concat=n=2:v=1:a=0[outv]");
    }

    #[test]
    fn test_graph_joins_with_semicolons() {
        let mut graph = FilterGraph::new();
        graph
            .push(FilterStage::new(vec![Pad::video(0)], Filter::Copy, vec!["v0".into()]))
            .push(FilterStage::new(
                vec![Pad::label("v0")],
                Filter::Concat { segments: 1, video: 1, audio: 0 },
                vec!["outv".into()],
            ));

        assert_eq!(graph.to_string(), "[0:v]copy[v0];[v0]concat=n=1:v=1:a=0[outv]");
        assert_eq!(graph.input_indices(), vec![0]);
        assert!(graph.check(1).is_ok());
    }

    #[test]
    fn test_check_catches_dangling_labels() {
        let mut graph = FilterGraph::new();
        graph.push(FilterStage::new(
            vec![Pad::label("v9")],
            Filter::Concat { segments: 1, video: 1, audio: 0 },
            vec!["outv".into()],
        ));
        assert!(graph.check(1).unwrap_err().contains("[v9]"));

        let mut graph = FilterGraph::new();
        graph.push(FilterStage::new(vec![Pad::video(3)], Filter::Copy, vec!["v0".into()]));
        assert!(graph.check(2).is_err());
    }
}

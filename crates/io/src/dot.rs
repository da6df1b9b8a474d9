use std::fmt;
use std::io;
use std::io::Write;
use std::path::Path;

use duct::cmd;
use itertools::Itertools;
use log::debug;
use nfadfa_automata::FiniteAutomaton;

use crate::IOError;

/// The image formats that Graphviz can render a diagram into.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Svg,
    Pdf,
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageFormat::Png => write!(f, "png"),
            ImageFormat::Svg => write!(f, "svg"),
            ImageFormat::Pdf => write!(f, "pdf"),
        }
    }
}

/// Writes the automaton as a Graphviz digraph, laid out from left to right.
///
/// Final states are drawn with a double circle and the initial state has an
/// incoming arrow from an invisible node. All the symbols that lead from one
/// state to another are combined into a single edge label.
pub fn write_dot(mut f: impl Write, automaton: &impl FiniteAutomaton) -> io::Result<()> {
    writeln!(&mut f, "digraph automaton {{")?;
    writeln!(&mut f, "  rankdir=LR;")?;
    writeln!(&mut f, "  node [shape=circle];")?;

    for state in automaton.states() {
        if automaton.is_final(state) {
            writeln!(&mut f, "  {} [shape=doublecircle];", quote(state))?;
        } else {
            writeln!(&mut f, "  {};", quote(state))?;
        }
    }

    // State labels are never empty, so the empty name is free for the start node.
    writeln!(&mut f, "  \"\" [shape=none, label=\"\"];")?;
    writeln!(&mut f, "  \"\" -> {};", quote(automaton.initial_state()))?;

    for ((from, to), symbols) in automaton.edges() {
        let label = symbols.iter().join(",");
        writeln!(
            &mut f,
            "  {} -> {} [label={}];",
            quote(&from),
            quote(&to),
            quote(&label)
        )?;
    }

    writeln!(&mut f, "}}")
}

/// Renders the automaton into an image at the given path with the Graphviz
/// `dot` program, which must be available on the path.
pub fn render(
    automaton: &impl FiniteAutomaton,
    format: ImageFormat,
    output: impl AsRef<Path>,
) -> Result<(), IOError> {
    let mut diagram = Vec::new();
    write_dot(&mut diagram, automaton)?;

    debug!("Rendering {} with dot", output.as_ref().display());
    cmd!("dot", format!("-T{format}"), "-o", output.as_ref())
        .stdin_bytes(diagram)
        .run()
        .map_err(IOError::Render)?;

    Ok(())
}

/// Returns the label as a quoted Graphviz identifier.
fn quote(label: &str) -> String {
    format!("\"{}\"", label.replace('\\', "\\\\").replace('"', "\\\""))
}

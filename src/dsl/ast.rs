//! Abstract Syntax Tree types for the layout format.

use crate::analysis::AnalyzerConfig;
use crate::circuit::TerminalId;
use crate::components::ComponentKind;

/// Complete AST representation of a parsed layout file.
#[derive(Debug, Clone, Default)]
pub struct LayoutAst {
    /// Component placements, in file order
    pub components: Vec<ComponentDef>,
    /// Wires between terminals, in file order
    pub wires: Vec<WireDef>,
    /// `.tolerance` directive
    pub row_tolerance: Option<f64>,
    /// `.grid` directive
    pub grid_size: Option<f64>,
}

impl LayoutAst {
    /// Create a new empty layout AST.
    pub fn new() -> Self {
        Self::default()
    }

    /// Analyzer configuration implied by the file's directives.
    pub fn analyzer_config(&self) -> AnalyzerConfig {
        match self.row_tolerance {
            Some(tolerance) => AnalyzerConfig::new().with_row_tolerance(tolerance),
            None => AnalyzerConfig::new(),
        }
    }
}

/// A component line.
#[derive(Debug, Clone)]
pub struct ComponentDef {
    pub id: String,
    pub kind: ComponentKind,
    /// Ohms or volts; the kind's default when omitted
    pub value: Option<f64>,
    /// `at <x> <y>`
    pub position: Option<(f64, f64)>,
    /// `rot <degrees>`, validated when the session is built
    pub rotation: Option<i64>,
    /// Source line number for error reporting
    pub line: usize,
}

/// A `wire` line.
#[derive(Debug, Clone)]
pub struct WireDef {
    pub from: TerminalId,
    pub to: TerminalId,
    pub line: usize,
}

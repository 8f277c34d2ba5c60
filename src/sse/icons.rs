// ABOUTME: Static icon tables for tool names and analysis step names
// ABOUTME: Unknown names fall back to a generic gear (tools) or magnifier (analysis steps)
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

/// Icon used for tools missing from [`ToolKind`]
pub const DEFAULT_TOOL_ICON: &str = "⚙️";
/// Icon used for analysis steps missing from [`AnalysisStep`]
pub const DEFAULT_ANALYSIS_ICON: &str = "🔍";

/// Tools the execution pipeline reports on, keyed by their wire name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    /// `readFile`
    ReadFile,
    /// `writeFile`
    WriteFile,
    /// `editFile`
    EditFile,
    /// `listDirectory`
    ListDirectory,
    /// `analyzeProject`
    AnalyzeProject,
    /// `scaffoldProject`
    ScaffoldProject,
    /// `smartEdit`
    SmartEdit,
}

impl ToolKind {
    /// All known tools
    pub const ALL: [Self; 7] = [
        Self::ReadFile,
        Self::WriteFile,
        Self::EditFile,
        Self::ListDirectory,
        Self::AnalyzeProject,
        Self::ScaffoldProject,
        Self::SmartEdit,
    ];

    /// Look up a tool by its wire name (case-sensitive)
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "readFile" => Some(Self::ReadFile),
            "writeFile" => Some(Self::WriteFile),
            "editFile" => Some(Self::EditFile),
            "listDirectory" => Some(Self::ListDirectory),
            "analyzeProject" => Some(Self::AnalyzeProject),
            "scaffoldProject" => Some(Self::ScaffoldProject),
            "smartEdit" => Some(Self::SmartEdit),
            _ => None,
        }
    }

    /// Wire name of the tool
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::ReadFile => "readFile",
            Self::WriteFile => "writeFile",
            Self::EditFile => "editFile",
            Self::ListDirectory => "listDirectory",
            Self::AnalyzeProject => "analyzeProject",
            Self::ScaffoldProject => "scaffoldProject",
            Self::SmartEdit => "smartEdit",
        }
    }

    /// Icon shown next to events for this tool
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::ReadFile => "📖",
            Self::WriteFile => "✏️",
            Self::EditFile => "📝",
            Self::ListDirectory => "📁",
            Self::AnalyzeProject => "🔍",
            Self::ScaffoldProject => "🏗️",
            Self::SmartEdit => "🧠",
        }
    }
}

/// Named steps of the analysis phase
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisStep {
    /// Initial reading of the user's request
    TaskAnalysis,
    /// Clarifying what the user actually wants
    RequirementUnderstanding,
    /// Producing the ordered list of tool calls
    ExecutionPlan,
    /// Choosing languages, frameworks and libraries
    TechnologySelection,
    /// Laying out components and their boundaries
    ArchitectureDesign,
    /// Deciding which files to create or touch
    FilePlanning,
    /// Writing the code itself
    CodeGeneration,
    /// Checking the generated result
    TestingVerification,
}

impl AnalysisStep {
    /// All known analysis steps
    pub const ALL: [Self; 8] = [
        Self::TaskAnalysis,
        Self::RequirementUnderstanding,
        Self::ExecutionPlan,
        Self::TechnologySelection,
        Self::ArchitectureDesign,
        Self::FilePlanning,
        Self::CodeGeneration,
        Self::TestingVerification,
    ];

    /// Look up a step by its display name (case-sensitive)
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|step| step.name() == name)
    }

    /// Display name, as carried in `stepName`
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TaskAnalysis => "Task Analysis",
            Self::RequirementUnderstanding => "Requirement Understanding",
            Self::ExecutionPlan => "Execution Plan",
            Self::TechnologySelection => "Technology Selection",
            Self::ArchitectureDesign => "Architecture Design",
            Self::FilePlanning => "File Planning",
            Self::CodeGeneration => "Code Generation",
            Self::TestingVerification => "Testing & Verification",
        }
    }

    /// Icon shown next to events for this step
    #[must_use]
    pub const fn icon(self) -> &'static str {
        match self {
            Self::TaskAnalysis => "🧠",
            Self::RequirementUnderstanding => "💡",
            Self::ExecutionPlan => "📋",
            Self::TechnologySelection => "🔧",
            Self::ArchitectureDesign => "🏗️",
            Self::FilePlanning => "📁",
            Self::CodeGeneration => "💻",
            Self::TestingVerification => "✅",
        }
    }
}

/// Icon for a tool name, [`DEFAULT_TOOL_ICON`] when unknown
#[must_use]
pub fn tool_icon(tool_name: &str) -> &'static str {
    ToolKind::from_name(tool_name).map_or(DEFAULT_TOOL_ICON, ToolKind::icon)
}

/// Icon for an analysis step name, [`DEFAULT_ANALYSIS_ICON`] when unknown
#[must_use]
pub fn analysis_icon(step_name: &str) -> &'static str {
    AnalysisStep::from_name(step_name).map_or(DEFAULT_ANALYSIS_ICON, AnalysisStep::icon)
}

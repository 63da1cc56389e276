//! Logic tools exposed over MCP
//!
//! Every tool answers with pretty-printed JSON text. Failures inside a tool
//! never escape [`ToolRegistry::call`]: they become an `{"error", "type"}`
//! payload flagged with `isError`.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error, info};

use ladr_backends::LogicEngine;
use ladr_syntax::categorical::{self, Concept};
use ladr_syntax::{validate_formulas, ProblemSpec};

use crate::error::McpError;
use crate::protocol::ToolCallResult;

/// Returned when a proof or counterexample request has no goal
pub const NO_CONCLUSION: &str =
    "No conclusion found in input. For file input, ensure formulas(goals) section exists.";

/// Returned by the model tools when Mace4 was not found at startup
pub const MACE4_UNAVAILABLE: &str = "Mace4 not available";

/// JSON Schema for tool input validation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JsonSchema {
    /// Schema type (usually "object")
    #[serde(rename = "type")]
    pub schema_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<HashMap<String, PropertySchema>>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub required: Vec<String>,
}

impl JsonSchema {
    fn object(properties: Vec<(&str, PropertySchema)>, required: &[&str]) -> Self {
        Self {
            schema_type: "object".to_string(),
            properties: Some(
                properties
                    .into_iter()
                    .map(|(name, schema)| (name.to_string(), schema))
                    .collect(),
            ),
            required: required.iter().map(|r| r.to_string()).collect(),
        }
    }
}

/// Property schema within JSON Schema
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PropertySchema {
    #[serde(rename = "type")]
    pub property_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<serde_json::Value>,
    /// Array items schema
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<PropertySchema>>,
}

impl PropertySchema {
    fn typed(property_type: &str, description: &str) -> Self {
        Self {
            property_type: property_type.to_string(),
            description: Some(description.to_string()),
            enum_values: None,
            default: None,
            items: None,
        }
    }

    fn string(description: &str) -> Self {
        Self::typed("string", description)
    }

    fn integer(description: &str) -> Self {
        Self::typed("integer", description)
    }

    fn boolean(description: &str, default: bool) -> Self {
        Self {
            default: Some(json!(default)),
            ..Self::typed("boolean", description)
        }
    }

    fn string_array(description: &str) -> Self {
        Self {
            items: Some(Box::new(Self {
                description: None,
                ..Self::typed("string", "")
            })),
            ..Self::typed("array", description)
        }
    }

    fn one_of(description: &str, values: &[&str]) -> Self {
        Self {
            enum_values: Some(values.iter().map(|v| v.to_string()).collect()),
            ..Self::typed("string", description)
        }
    }
}

/// MCP tool definition
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDefinition {
    /// Tool name (unique identifier)
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub description: String,
    pub input_schema: JsonSchema,
}

/// Trait for implementing MCP tools
#[async_trait]
pub trait Tool: Send + Sync {
    fn definition(&self) -> ToolDefinition;

    /// Execute the tool with given arguments
    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolCallResult, McpError>;
}

fn parse_args<T: for<'de> Deserialize<'de>>(arguments: serde_json::Value) -> Result<T, McpError> {
    // Clients may send null or omit arguments entirely
    let arguments = if arguments.is_null() {
        json!({})
    } else {
        arguments
    };
    serde_json::from_value(arguments)
        .map_err(|e| McpError::InvalidParams(format!("Invalid arguments: {}", e)))
}

fn to_result<T: Serialize>(value: &T) -> Result<ToolCallResult, McpError> {
    ToolCallResult::json(value).map_err(|e| McpError::InternalError(e.to_string()))
}

/// Premises and goal from either an input file or inline arguments.
///
/// The input file wins when both are supplied.
fn resolve_problem(
    engine: &LogicEngine,
    input_file: Option<&str>,
    premises: Vec<String>,
    conclusion: Option<String>,
) -> Result<ProblemSpec, McpError> {
    match input_file {
        Some(path) => {
            debug!(path, "Reading problem from input file");
            engine.load_problem(path).map_err(|e| {
                McpError::InvalidParams(format!("Failed to parse input file {}: {}", path, e))
            })
        }
        None => Ok(ProblemSpec::new(premises, conclusion)),
    }
}

fn no_conclusion() -> serde_json::Value {
    json!({ "result": "error", "reason": NO_CONCLUSION })
}

fn mace4_unavailable() -> ToolCallResult {
    ToolCallResult::json_error(&json!({ "error": MACE4_UNAVAILABLE }))
}

/// Inline problem arguments shared by prove and find-counterexample
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProblemArgs {
    #[serde(default)]
    pub premises: Vec<String>,
    #[serde(default)]
    pub conclusion: Option<String>,
    #[serde(default)]
    pub input_file: Option<String>,
    #[serde(default)]
    pub domain_size: Option<u32>,
}

fn problem_properties(conclusion_description: &str) -> Vec<(&'static str, PropertySchema)> {
    vec![
        (
            "premises",
            PropertySchema::string_array("List of logical premises"),
        ),
        ("conclusion", PropertySchema::string(conclusion_description)),
        (
            "input_file",
            PropertySchema::string(
                "Path to a Prover9 .in file containing formulas(assumptions) and \
                 formulas(goals); takes precedence over premises/conclusion",
            ),
        ),
    ]
}

fn domain_size_property() -> (&'static str, PropertySchema) {
    (
        "domain_size",
        PropertySchema::integer(
            "Optional: specific domain size to search (default: search sizes 2 to 10)",
        ),
    )
}

// ============================================================================
// prove tool
// ============================================================================

/// Prove a goal from premises with Prover9
pub struct ProveTool {
    engine: Arc<LogicEngine>,
}

impl ProveTool {
    pub fn new(engine: Arc<LogicEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for ProveTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "prove".to_string(),
            title: Some("Prove Theorem".to_string()),
            description: "Prove a logical statement using Prover9. Supports both JSON input \
                          (premises + conclusion) and .in files (input_file)."
                .to_string(),
            input_schema: JsonSchema::object(problem_properties("Statement to prove"), &[]),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolCallResult, McpError> {
        let args: ProblemArgs = parse_args(arguments)?;
        let problem = resolve_problem(
            &self.engine,
            args.input_file.as_deref(),
            args.premises,
            args.conclusion,
        )?;

        if !problem.has_goal() {
            return to_result(&no_conclusion());
        }

        let validation = validate_formulas(&problem.all_formulas());
        if !validation.valid {
            info!(summary = %validation.summary, "Rejected malformed formulas");
            return to_result(&json!({ "result": "syntax_error", "validation": validation }));
        }

        let result = self.engine.prover().prove(&problem).await;
        to_result(&result)
    }
}

// ============================================================================
// check-well-formed tool
// ============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckWellFormedArgs {
    #[serde(default)]
    pub statements: Option<Vec<String>>,
    #[serde(default)]
    pub input_file: Option<String>,
}

/// Lexical well-formedness check of formulas
pub struct CheckWellFormedTool {
    engine: Arc<LogicEngine>,
}

impl CheckWellFormedTool {
    pub fn new(engine: Arc<LogicEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for CheckWellFormedTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "check-well-formed".to_string(),
            title: Some("Check Well-Formedness".to_string()),
            description: "Check if logical statements are well-formed with detailed syntax \
                          validation. Supports both JSON input and .in files."
                .to_string(),
            input_schema: JsonSchema::object(
                vec![
                    (
                        "statements",
                        PropertySchema::string_array("Logical statements to check"),
                    ),
                    (
                        "input_file",
                        PropertySchema::string("Path to a .in file containing formulas to validate"),
                    ),
                ],
                &[],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolCallResult, McpError> {
        let args: CheckWellFormedArgs = parse_args(arguments)?;

        let statements = match (args.input_file, args.statements) {
            (Some(path), _) => match self.engine.load_problem(&path) {
                Ok(problem) => problem.all_formulas(),
                Err(e) => {
                    return to_result(&json!({
                        "result": "error",
                        "reason": format!("Failed to parse input file: {}", e),
                    }))
                }
            },
            (None, Some(statements)) => statements,
            (None, None) => {
                return Err(McpError::InvalidParams(
                    "Either statements or input_file is required".to_string(),
                ))
            }
        };

        to_result(&validate_formulas(&statements))
    }
}

// ============================================================================
// find-model tool
// ============================================================================

/// Finite model search with Mace4
pub struct FindModelTool {
    engine: Arc<LogicEngine>,
}

impl FindModelTool {
    pub fn new(engine: Arc<LogicEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for FindModelTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "find-model".to_string(),
            title: Some("Find Finite Model".to_string()),
            description: "Use Mace4 to find a finite model satisfying the given premises. \
                          Supports both JSON input and .in files."
                .to_string(),
            input_schema: JsonSchema::object(
                vec![
                    (
                        "premises",
                        PropertySchema::string_array("List of logical premises"),
                    ),
                    (
                        "input_file",
                        PropertySchema::string(
                            "Path to a Mace4 .in file containing formulas(assumptions)",
                        ),
                    ),
                    domain_size_property(),
                ],
                &[],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolCallResult, McpError> {
        let Some(finder) = self.engine.model_finder() else {
            return Ok(mace4_unavailable());
        };
        let args: ProblemArgs = parse_args(arguments)?;
        let problem = resolve_problem(&self.engine, args.input_file.as_deref(), args.premises, None)?;

        let result = finder.find_model(&problem.premises, args.domain_size).await;
        to_result(&result)
    }
}

// ============================================================================
// find-counterexample tool
// ============================================================================

/// Search for a model of the premises where the conclusion fails
pub struct FindCounterexampleTool {
    engine: Arc<LogicEngine>,
}

impl FindCounterexampleTool {
    pub fn new(engine: Arc<LogicEngine>) -> Self {
        Self { engine }
    }
}

#[async_trait]
impl Tool for FindCounterexampleTool {
    fn definition(&self) -> ToolDefinition {
        let mut properties = problem_properties("Conclusion to disprove");
        properties.push(domain_size_property());
        ToolDefinition {
            name: "find-counterexample".to_string(),
            title: Some("Find Counterexample".to_string()),
            description: "Use Mace4 to find a counterexample showing the conclusion doesn't \
                          follow from premises. Supports both JSON input and .in files."
                .to_string(),
            input_schema: JsonSchema::object(properties, &[]),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolCallResult, McpError> {
        let Some(finder) = self.engine.model_finder() else {
            return Ok(mace4_unavailable());
        };
        let args: ProblemArgs = parse_args(arguments)?;
        let problem = resolve_problem(
            &self.engine,
            args.input_file.as_deref(),
            args.premises,
            args.conclusion,
        )?;

        let Some(conclusion) = problem.goal.as_deref() else {
            return to_result(&no_conclusion());
        };

        let result = finder
            .find_counterexample(&problem.premises, conclusion, args.domain_size)
            .await;
        to_result(&result)
    }
}

// ============================================================================
// verify-commutativity tool
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyCommutativityArgs {
    pub path_a: Vec<String>,
    pub path_b: Vec<String>,
    pub object_start: String,
    pub object_end: String,
    #[serde(default = "default_true")]
    pub with_category_axioms: bool,
}

fn default_true() -> bool {
    true
}

/// Premises and conclusion stating that a diagram commutes
pub struct VerifyCommutativityTool;

#[async_trait]
impl Tool for VerifyCommutativityTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "verify-commutativity".to_string(),
            title: Some("Verify Diagram Commutativity".to_string()),
            description: "Verify that a categorical diagram commutes by generating FOL \
                          premises and conclusion"
                .to_string(),
            input_schema: JsonSchema::object(
                vec![
                    (
                        "path_a",
                        PropertySchema::string_array("List of morphism names in first path"),
                    ),
                    (
                        "path_b",
                        PropertySchema::string_array("List of morphism names in second path"),
                    ),
                    ("object_start", PropertySchema::string("Starting object")),
                    ("object_end", PropertySchema::string("Ending object")),
                    (
                        "with_category_axioms",
                        PropertySchema::boolean(
                            "Include basic category theory axioms (default: true)",
                            true,
                        ),
                    ),
                ],
                &["path_a", "path_b", "object_start", "object_end"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolCallResult, McpError> {
        let args: VerifyCommutativityArgs = parse_args(arguments)?;
        let (diagram, conclusion) = categorical::commutativity_problem(
            &args.path_a,
            &args.path_b,
            &args.object_start,
            &args.object_end,
        )
        .ok_or_else(|| {
            McpError::InvalidParams("path_a and path_b must each name a morphism".to_string())
        })?;

        let mut premises = if args.with_category_axioms {
            categorical::category_axioms()
        } else {
            Vec::new()
        };
        premises.extend(diagram);

        to_result(&json!({
            "premises": premises,
            "conclusion": conclusion,
            "note": "Use the 'prove' tool with these premises and conclusion to verify commutativity",
        }))
    }
}

// ============================================================================
// get-category-axioms tool
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetCategoryAxiomsArgs {
    pub concept: String,
    #[serde(default = "default_functor")]
    pub functor_name: String,
    #[serde(default = "default_functor")]
    pub functor_f: String,
    #[serde(default = "default_functor_g")]
    pub functor_g: String,
    #[serde(default = "default_component")]
    pub component: String,
}

fn default_functor() -> String {
    "F".to_string()
}

fn default_functor_g() -> String {
    "G".to_string()
}

fn default_component() -> String {
    "alpha".to_string()
}

/// Fixed axiom sets for category theory and algebra
pub struct GetCategoryAxiomsTool;

#[async_trait]
impl Tool for GetCategoryAxiomsTool {
    fn definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: "get-category-axioms".to_string(),
            title: Some("Get Category Axioms".to_string()),
            description: "Get FOL axioms for category theory concepts (category, functor, \
                          natural transformation) and basic algebra (monoid, group)"
                .to_string(),
            input_schema: JsonSchema::object(
                vec![
                    (
                        "concept",
                        PropertySchema::one_of(
                            "Which concept's axioms to retrieve",
                            &Concept::NAMES,
                        ),
                    ),
                    (
                        "functor_name",
                        PropertySchema::string("For functor axioms: name of the functor (default: F)"),
                    ),
                    (
                        "functor_f",
                        PropertySchema::string("For natural transformations: source functor (default: F)"),
                    ),
                    (
                        "functor_g",
                        PropertySchema::string("For natural transformations: target functor (default: G)"),
                    ),
                    (
                        "component",
                        PropertySchema::string(
                            "For natural transformations: component family (default: alpha)",
                        ),
                    ),
                ],
                &["concept"],
            ),
        }
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolCallResult, McpError> {
        let args: GetCategoryAxiomsArgs = parse_args(arguments)?;
        let concept = Concept::from_name(&args.concept).ok_or_else(|| {
            McpError::InvalidParams(format!(
                "Unknown concept '{}', expected one of: {}",
                args.concept,
                Concept::NAMES.join(", ")
            ))
        })?;

        let axioms = match concept {
            Concept::Category => categorical::category_axioms(),
            Concept::Functor => categorical::functor_axioms(&args.functor_name),
            Concept::NaturalTransformation => categorical::natural_transformation_condition(
                &args.functor_f,
                &args.functor_g,
                &args.component,
            ),
            Concept::Monoid => categorical::monoid_axioms(),
            Concept::Group => categorical::group_axioms(),
        };

        to_result(&json!({ "concept": args.concept, "axioms": axioms }))
    }
}

// ============================================================================
// Registry
// ============================================================================

/// All logic tools, bound to one engine
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
}

impl ToolRegistry {
    pub fn new(engine: Arc<LogicEngine>) -> Self {
        Self {
            tools: vec![
                Box::new(ProveTool::new(engine.clone())),
                Box::new(CheckWellFormedTool::new(engine.clone())),
                Box::new(FindModelTool::new(engine.clone())),
                Box::new(FindCounterexampleTool::new(engine)),
                Box::new(VerifyCommutativityTool),
                Box::new(GetCategoryAxiomsTool),
            ],
        }
    }

    /// Get all tool definitions
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.definition()).collect()
    }

    /// Find a tool by name
    pub fn find(&self, name: &str) -> Option<&dyn Tool> {
        self.tools
            .iter()
            .find(|t| t.definition().name == name)
            .map(|t| t.as_ref())
    }

    /// Execute a tool by name
    pub async fn execute(
        &self,
        name: &str,
        arguments: serde_json::Value,
    ) -> Result<ToolCallResult, McpError> {
        let tool = self
            .find(name)
            .ok_or_else(|| McpError::ToolNotFound(name.to_string()))?;
        tool.execute(arguments).await
    }

    /// Execute a tool by name, turning any failure into an error payload
    pub async fn call(&self, name: &str, arguments: serde_json::Value) -> ToolCallResult {
        match self.execute(name, arguments).await {
            Ok(result) => result,
            Err(e) => {
                error!(tool = name, error = %e, "Tool error");
                ToolCallResult::json_error(&json!({ "error": e.to_string(), "type": e.kind() }))
            }
        }
    }
}

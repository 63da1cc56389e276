//! Tests for ladr-mcp

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{json, Value};

use ladr_backends::{EngineConfig, LogicEngine, ModelFinder, ModelResult, ProofResult, TheoremProver};
use ladr_syntax::ProblemSpec;

use crate::error::{ErrorCode, JsonRpcError, McpError};
use crate::protocol::{
    Content, InitializeResult, JsonRpcRequest, JsonRpcResponse, RequestId, ToolCallResult,
    MCP_VERSION,
};
use crate::server::McpServer;
use crate::tools::{ToolRegistry, MACE4_UNAVAILABLE, NO_CONCLUSION};

// ============================================================================
// Test doubles
// ============================================================================

/// Prover that records calls and proves everything
#[derive(Default)]
struct RecordingProver {
    calls: AtomicUsize,
}

#[async_trait]
impl TheoremProver for RecordingProver {
    fn name(&self) -> &'static str {
        "recording"
    }

    async fn prove(&self, problem: &ProblemSpec) -> ProofResult {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ProofResult::Proved {
            proof: format!("{} premises", problem.premises.len()),
            complete_output: String::new(),
        }
    }
}

/// Model finder that echoes its inputs back in the model text
struct EchoFinder;

#[async_trait]
impl ModelFinder for EchoFinder {
    fn name(&self) -> &'static str {
        "echo"
    }

    async fn find_model(&self, premises: &[String], domain_size: Option<u32>) -> ModelResult {
        ModelResult::ModelFound {
            domain_size,
            model: premises.join(" & "),
        }
    }

    async fn find_counterexample(
        &self,
        premises: &[String],
        conclusion: &str,
        domain_size: Option<u32>,
    ) -> ModelResult {
        ModelResult::CounterexampleFound {
            domain_size,
            model: format!("{} |/- {}", premises.join(" & "), conclusion),
            interpretation: String::new(),
        }
    }
}

fn engine_with(prover: Arc<RecordingProver>, finder: Option<Arc<dyn ModelFinder>>) -> Arc<LogicEngine> {
    Arc::new(LogicEngine::from_parts(
        EngineConfig::new("/opt/ladr/bin"),
        prover,
        finder,
    ))
}

fn registry() -> (ToolRegistry, Arc<RecordingProver>) {
    let prover = Arc::new(RecordingProver::default());
    let finder: Arc<dyn ModelFinder> = Arc::new(EchoFinder);
    (ToolRegistry::new(engine_with(prover.clone(), Some(finder))), prover)
}

fn payload(result: &ToolCallResult) -> Value {
    result.first_json().expect("tool result is JSON text")
}

const SOCRATES_FILE: &str = "\
formulas(assumptions).
all x (man(x) -> mortal(x)).
man(socrates).
end_of_list.

formulas(goals).
mortal(socrates).
mortal(plato).
end_of_list.
";

// ============================================================================
// Protocol tests
// ============================================================================

#[test]
fn test_request_id_forms() {
    assert_eq!(RequestId::from(42i64), RequestId::Number(42));
    assert_eq!(RequestId::from("abc"), RequestId::String("abc".to_string()));
}

#[test]
fn test_json_rpc_request_creation() {
    let req = JsonRpcRequest::new(1i64, "tools/list").with_params(json!({"cursor": null}));
    assert_eq!(req.jsonrpc, "2.0");
    assert_eq!(req.method, "tools/list");
    assert!(req.params.is_some());
}

#[test]
fn test_json_rpc_response_error_has_code() {
    let error = JsonRpcError::new(ErrorCode::InvalidParams, "bad");
    let resp = JsonRpcResponse::error(Some(RequestId::from(1i64)), error);
    assert!(resp.result.is_none());
    assert_eq!(resp.error.as_ref().unwrap().code, -32602);
}

#[test]
fn test_error_codes() {
    assert_eq!(ErrorCode::ParseError.code(), -32700);
    assert_eq!(ErrorCode::InvalidRequest.code(), -32600);
    assert_eq!(ErrorCode::MethodNotFound.code(), -32601);
    assert_eq!(ErrorCode::InternalError.code(), -32603);
    assert_eq!(ErrorCode::ToolNotFound.code(), -32000);

    let err: JsonRpcError = McpError::ToolNotFound("nope".to_string()).into();
    assert_eq!(err.code, -32000);
    assert_eq!(err.message, "Tool not found: nope");
}

#[test]
fn test_tool_call_result_json_is_pretty() {
    let result = ToolCallResult::json(&json!({"result": "proved"})).unwrap();
    assert!(result.is_error.is_none());
    match &result.content[0] {
        Content::Text { text } => assert!(text.contains("\n")),
    }
}

#[test]
fn test_initialize_result_default() {
    let init = InitializeResult::default();
    assert_eq!(init.protocol_version, MCP_VERSION);
    let value = serde_json::to_value(&init).unwrap();
    assert_eq!(value["serverInfo"]["name"], "logic");
    assert!(value["capabilities"]["tools"].is_object());
}

// ============================================================================
// Tool registry tests
// ============================================================================

#[test]
fn test_registry_lists_all_tools() {
    let (registry, _) = registry();
    let names: Vec<String> = registry.definitions().into_iter().map(|d| d.name).collect();
    assert_eq!(
        names,
        vec![
            "prove",
            "check-well-formed",
            "find-model",
            "find-counterexample",
            "verify-commutativity",
            "get-category-axioms",
        ]
    );
}

#[test]
fn test_definitions_serialize_camel_case() {
    let (registry, _) = registry();
    let value = serde_json::to_value(registry.definitions()).unwrap();
    assert_eq!(value[0]["inputSchema"]["type"], "object");
    assert_eq!(
        value[4]["inputSchema"]["required"],
        json!(["path_a", "path_b", "object_start", "object_end"])
    );
}

#[tokio::test]
async fn test_unknown_tool_is_structured_error() {
    let (registry, _) = registry();
    let result = registry.call("disprove", json!({})).await;
    assert_eq!(result.is_error, Some(true));
    let value = payload(&result);
    assert_eq!(value["type"], "ToolNotFound");
    assert_eq!(value["error"], "Tool not found: disprove");
}

#[tokio::test]
async fn test_execute_reports_tool_not_found() {
    let (registry, _) = registry();
    let err = registry.execute("disprove", json!({})).await.unwrap_err();
    assert!(matches!(err, McpError::ToolNotFound(_)));
}

#[tokio::test]
async fn test_prove_inline() {
    let (registry, prover) = registry();
    let result = registry
        .call(
            "prove",
            json!({
                "premises": ["all x (man(x) -> mortal(x))", "man(socrates)"],
                "conclusion": "mortal(socrates)",
            }),
        )
        .await;
    let value = payload(&result);
    assert_eq!(value["result"], "proved");
    assert_eq!(value["proof"], "2 premises");
    assert_eq!(prover.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_prove_without_conclusion() {
    let (registry, prover) = registry();
    let result = registry.call("prove", json!({"premises": ["p(a)"]})).await;
    let value = payload(&result);
    assert_eq!(value, json!({"result": "error", "reason": NO_CONCLUSION}));
    assert_eq!(prover.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_prove_rejects_malformed_formula_before_running() {
    let (registry, prover) = registry();
    let result = registry
        .call(
            "prove",
            json!({"premises": ["all x (man(x) -> mortal(x)"], "conclusion": "mortal(socrates)"}),
        )
        .await;
    let value = payload(&result);
    assert_eq!(value["result"], "syntax_error");
    assert_eq!(value["validation"]["valid"], false);
    assert_eq!(prover.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_prove_file_with_labelled_premises() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("labelled.in");
    std::fs::write(
        &path,
        "formulas(assumptions).\nall x (man(x) -> mortal(x)) # label(rule).\n\
         man(socrates) # label(fact).\nend_of_list.\n\
         formulas(goals).\nmortal(socrates) # answer(socrates).\nend_of_list.\n",
    )
    .unwrap();

    let (registry, prover) = registry();
    let result = registry.call("prove", json!({"input_file": path})).await;
    let value = payload(&result);
    assert_eq!(value["result"], "proved");
    assert_eq!(value["proof"], "2 premises");
    assert_eq!(prover.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_prove_rejects_doubled_terminator() {
    let (registry, prover) = registry();
    let result = registry
        .call("prove", json!({"premises": ["p(a).."], "conclusion": "p(a)"}))
        .await;
    let value = payload(&result);
    assert_eq!(value["result"], "syntax_error");
    assert_eq!(
        value["validation"]["formulas"][0]["errors"][0],
        "Formula ends with more than one '.'"
    );
    assert_eq!(prover.calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_input_file_wins_and_keeps_first_goal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("socrates.in");
    std::fs::write(&path, SOCRATES_FILE).unwrap();

    let (registry, _) = registry();
    let result = registry
        .call(
            "find-counterexample",
            json!({"input_file": path, "premises": ["ignored(x)"], "conclusion": "ignored(y)"}),
        )
        .await;
    let value = payload(&result);
    assert_eq!(value["result"], "counterexample_found");
    assert_eq!(
        value["model"],
        "all x (man(x) -> mortal(x)) & man(socrates) |/- mortal(socrates)"
    );
}

#[tokio::test]
async fn test_prove_missing_file_is_structured_error() {
    let (registry, _) = registry();
    let result = registry
        .call("prove", json!({"input_file": "/nonexistent/problem.in"}))
        .await;
    assert_eq!(result.is_error, Some(true));
    let value = payload(&result);
    assert_eq!(value["type"], "InvalidParams");
    assert!(value["error"]
        .as_str()
        .unwrap()
        .contains("Failed to parse input file /nonexistent/problem.in"));
}

#[tokio::test]
async fn test_invalid_argument_types() {
    let (registry, _) = registry();
    let result = registry.call("prove", json!({"premises": "p(a)"})).await;
    assert_eq!(payload(&result)["type"], "InvalidParams");
}

#[tokio::test]
async fn test_check_well_formed_statements() {
    let (registry, _) = registry();
    let result = registry
        .call("check-well-formed", json!({"statements": ["p(a)", "q(("]}))
        .await;
    let value = payload(&result);
    assert_eq!(value["valid"], false);
    assert_eq!(value["summary"], "1 of 2 formulas well-formed");
    assert_eq!(value["formulas"][1]["formula"], "q((");
}

#[tokio::test]
async fn test_check_well_formed_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("socrates.in");
    std::fs::write(&path, SOCRATES_FILE).unwrap();

    let (registry, _) = registry();
    let result = registry
        .call("check-well-formed", json!({"input_file": path}))
        .await;
    let value = payload(&result);
    assert_eq!(value["valid"], true);
    assert_eq!(value["formulas"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_check_well_formed_requires_input() {
    let (registry, _) = registry();
    let result = registry.call("check-well-formed", json!({})).await;
    assert_eq!(result.is_error, Some(true));
}

#[tokio::test]
async fn test_find_model_passes_domain_size() {
    let (registry, _) = registry();
    let result = registry
        .call("find-model", json!({"premises": ["p(a)"], "domain_size": 3}))
        .await;
    let value = payload(&result);
    assert_eq!(value["result"], "model_found");
    assert_eq!(value["domain_size"], 3);
    assert_eq!(value["model"], "p(a)");
}

#[tokio::test]
async fn test_model_tools_without_mace4() {
    let prover = Arc::new(RecordingProver::default());
    let registry = ToolRegistry::new(engine_with(prover, None));

    for tool in ["find-model", "find-counterexample"] {
        let result = registry
            .call(tool, json!({"premises": ["p(a)"], "conclusion": "q(a)"}))
            .await;
        assert_eq!(payload(&result), json!({"error": MACE4_UNAVAILABLE}), "{tool}");
    }
}

#[tokio::test]
async fn test_find_counterexample_without_conclusion() {
    let (registry, _) = registry();
    let result = registry
        .call("find-counterexample", json!({"premises": ["p(a)"]}))
        .await;
    assert_eq!(payload(&result)["reason"], NO_CONCLUSION);
}

#[tokio::test]
async fn test_verify_commutativity() {
    let (registry, _) = registry();
    let result = registry
        .call(
            "verify-commutativity",
            json!({
                "path_a": ["f", "g"],
                "path_b": ["h", "k"],
                "object_start": "A",
                "object_end": "D",
                "with_category_axioms": false,
            }),
        )
        .await;
    let value = payload(&result);
    assert_eq!(value["conclusion"], "comp(g,f) = comp(k,h)");
    assert_eq!(value["premises"][0], "object(A)");
    assert!(value["note"].as_str().unwrap().contains("prove"));
}

#[tokio::test]
async fn test_verify_commutativity_includes_axioms_by_default() {
    let (registry, _) = registry();
    let result = registry
        .call(
            "verify-commutativity",
            json!({"path_a": ["f"], "path_b": ["g"], "object_start": "A", "object_end": "B"}),
        )
        .await;
    let value = payload(&result);
    let premises = value["premises"].as_array().unwrap();
    assert_eq!(
        premises[0].as_str().unwrap(),
        ladr_syntax::categorical::category_axioms()[0]
    );
}

#[tokio::test]
async fn test_verify_commutativity_empty_path() {
    let (registry, _) = registry();
    let result = registry
        .call(
            "verify-commutativity",
            json!({"path_a": [], "path_b": ["g"], "object_start": "A", "object_end": "B"}),
        )
        .await;
    assert_eq!(result.is_error, Some(true));
}

#[tokio::test]
async fn test_get_category_axioms() {
    let (registry, _) = registry();
    let result = registry
        .call("get-category-axioms", json!({"concept": "functor", "functor_name": "H"}))
        .await;
    let value = payload(&result);
    assert_eq!(value["concept"], "functor");
    assert!(value["axioms"][0].as_str().unwrap().contains("H_obj"));

    let result = registry
        .call("get-category-axioms", json!({"concept": "group"}))
        .await;
    assert_eq!(payload(&result)["axioms"].as_array().unwrap().len(), 5);
}

#[tokio::test]
async fn test_get_category_axioms_unknown_concept() {
    let (registry, _) = registry();
    let result = registry
        .call("get-category-axioms", json!({"concept": "topos"}))
        .await;
    assert_eq!(payload(&result)["type"], "InvalidParams");
}

// ============================================================================
// Server tests
// ============================================================================

fn server() -> McpServer {
    let (registry, _) = registry();
    McpServer::with_registry(registry)
}

#[tokio::test]
async fn test_handle_initialize() {
    let resp = server()
        .handle_request(JsonRpcRequest::new(1i64, "initialize"))
        .await;
    assert_eq!(resp.result.unwrap()["protocolVersion"], MCP_VERSION);
}

#[tokio::test]
async fn test_handle_ping() {
    let resp = server().handle_request(JsonRpcRequest::new(2i64, "ping")).await;
    assert_eq!(resp.result, Some(json!({})));
}

#[tokio::test]
async fn test_handle_tools_list() {
    let resp = server()
        .handle_request(JsonRpcRequest::new(3i64, "tools/list"))
        .await;
    assert_eq!(resp.result.unwrap()["tools"].as_array().unwrap().len(), 6);
}

#[tokio::test]
async fn test_handle_tools_call() {
    let req = JsonRpcRequest::new("call-1", "tools/call").with_params(json!({
        "name": "get-category-axioms",
        "arguments": {"concept": "monoid"},
    }));
    let resp = server().handle_request(req).await;
    assert_eq!(resp.id, Some(RequestId::from("call-1")));
    let result = resp.result.unwrap();
    let text = result["content"][0]["text"].as_str().unwrap();
    let value: Value = serde_json::from_str(text).unwrap();
    assert_eq!(value["axioms"].as_array().unwrap().len(), 3);
}

#[tokio::test]
async fn test_handle_tools_call_missing_params() {
    let resp = server()
        .handle_request(JsonRpcRequest::new(4i64, "tools/call"))
        .await;
    assert_eq!(resp.error.unwrap().code, ErrorCode::InvalidParams.code());
}

#[tokio::test]
async fn test_handle_unknown_method() {
    let resp = server()
        .handle_request(JsonRpcRequest::new(5i64, "resources/list"))
        .await;
    assert_eq!(resp.error.unwrap().code, -32601);
}

#[tokio::test]
async fn test_handle_wrong_version() {
    let mut req = JsonRpcRequest::new(6i64, "ping");
    req.jsonrpc = "1.0".to_string();
    let resp = server().handle_request(req).await;
    assert_eq!(resp.error.unwrap().code, -32600);
}

#[tokio::test]
async fn test_run_over_in_memory_streams() {
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
        "not json\n",
        "\n",
        r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
        "\n",
    );
    let (client, server_end) = tokio::io::duplex(1 << 16);
    let server = Arc::new(server());

    server
        .run(input.as_bytes(), server_end)
        .await
        .unwrap();

    let mut output = String::new();
    let mut client = client;
    tokio::io::AsyncReadExt::read_to_string(&mut client, &mut output)
        .await
        .unwrap();

    let responses: Vec<Value> = output
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(responses.len(), 3);

    let parse_error = responses
        .iter()
        .find(|r| r["error"].is_object())
        .unwrap();
    assert_eq!(parse_error["error"]["code"], -32700);
    assert!(parse_error["id"].is_null());

    let ids: Vec<i64> = responses.iter().filter_map(|r| r["id"].as_i64()).collect();
    assert!(ids.contains(&1));
    assert!(ids.contains(&2));
}

#[tokio::test]
async fn test_run_rejects_unusable_ids() {
    let input = concat!(
        r#"{"jsonrpc":"2.0","id":null,"method":"ping"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","id":1.5,"method":"ping"}"#,
        "\n",
        r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
        "\n",
    );
    let (mut client, server_end) = tokio::io::duplex(1 << 16);
    Arc::new(server())
        .run(input.as_bytes(), server_end)
        .await
        .unwrap();

    let mut output = String::new();
    tokio::io::AsyncReadExt::read_to_string(&mut client, &mut output)
        .await
        .unwrap();

    let responses: Vec<Value> = output
        .lines()
        .map(|l| serde_json::from_str(l).unwrap())
        .collect();
    assert_eq!(responses.len(), 2);
    for response in &responses {
        assert_eq!(response["error"]["code"], -32600);
        assert!(response["id"].is_null());
    }
}

// ../tests/pipeline.rs
use async_trait::async_trait;
use persona_chat::prompt::NO_INFORMATION;
use persona_chat::*;
use std::sync::{
    Arc, Mutex,
    atomic::{AtomicUsize, Ordering},
};

const PRIMARY: &str = "primary-model";
const HELPER: &str = "helper-model";

// Answers by request kind: JSON requests are decisions, other helper
// requests are summaries, everything else is the persona reply.
struct ScriptedModel {
    decision: Option<String>,
    summary: Option<String>,
    reply: Option<String>,
    requests: Mutex<Vec<CompletionRequest>>,
}

impl ScriptedModel {
    fn new(decision: Option<&str>, summary: Option<&str>, reply: Option<&str>) -> Self {
        Self {
            decision: decision.map(str::to_string),
            summary: summary.map(str::to_string),
            reply: reply.map(str::to_string),
            requests: Mutex::new(Vec::new()),
        }
    }

    fn requests(&self) -> Vec<CompletionRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn complete(&self, request: CompletionRequest) -> Result<Completion, AIError> {
        let scripted = if request.json_output {
            self.decision.clone()
        } else if request.model == HELPER {
            self.summary.clone()
        } else {
            self.reply.clone()
        };
        self.requests.lock().unwrap().push(request);
        scripted
            .map(|content| Completion {
                content,
                usage: Usage::new(500, 200),
            })
            .ok_or(AIError::NoMessageFound)
    }
}

#[derive(Clone)]
enum Outcome {
    Found(Vec<SearchResult>),
    Empty,
    Fail,
}

struct ScriptedStrategy {
    outcome: Outcome,
    calls: Arc<AtomicUsize>,
}

impl ScriptedStrategy {
    fn boxed(outcome: Outcome) -> (Box<dyn SearchStrategy>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let strategy = ScriptedStrategy {
            outcome,
            calls: Arc::clone(&calls),
        };
        (Box::new(strategy), calls)
    }
}

#[async_trait]
impl SearchStrategy for ScriptedStrategy {
    fn name(&self) -> String {
        "scripted".to_string()
    }

    async fn search(
        &self,
        _query: &str,
        max_results: usize,
    ) -> Result<Vec<SearchResult>, SearchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.outcome {
            Outcome::Found(results) => Ok(results.iter().take(max_results).cloned().collect()),
            Outcome::Empty => Ok(Vec::new()),
            Outcome::Fail => Err(SearchError::Status(503)),
        }
    }
}

fn config() -> PipelineConfig {
    PipelineConfig {
        primary_model: PRIMARY.to_string(),
        helper_model: HELPER.to_string(),
        temperature: 0.8,
        max_tokens: 2000,
        max_search_results: 5,
    }
}

fn reichenbach_results() -> Vec<SearchResult> {
    vec![
        SearchResult::new(
            "Reichenbach Falls",
            "Reichenbach Falls is a cascade on the Rychenbach in the Bernese Oberland.",
            "https://en.wikipedia.org/wiki/Reichenbach_Falls",
        ),
        SearchResult::new(
            "The Final Problem",
            "Holmes and Moriarty struggle at the falls in The Final Problem (1893).",
            "https://en.wikipedia.org/wiki/The_Final_Problem",
        ),
        SearchResult::new(
            "Sherlock Holmes Museum Meiringen",
            "Meiringen hosts a museum dedicated to the detective.",
            "https://example.org/meiringen",
        ),
    ]
}

fn request(message: &str, search_enabled: bool) -> TurnRequest {
    TurnRequest {
        persona: persona::find("sherlock").unwrap(),
        history: Vec::new(),
        user_message: message.to_string(),
        search_enabled,
    }
}

async fn run(pipeline: &TurnPipeline, request: TurnRequest) -> (TurnResult, Vec<TurnStage>) {
    let stages = Mutex::new(Vec::new());
    let observer = |stage: TurnStage| stages.lock().unwrap().push(stage);
    let result = pipeline.run_turn(request, &observer).await;
    (result, stages.into_inner().unwrap())
}

const REICHENBACH_DECISION: &str = r#"{"need_search": true, "search_query": "Reichenbach Falls Sherlock Holmes", "reason": "Specific location from the stories"}"#;

#[tokio::test]
async fn test_reichenbach_turn_uses_search() {
    let digest = "The Reichenbach Falls lie near Meiringen. Holmes and Moriarty fought there in The Final Problem. The scene was published in 1893.";
    let model = Arc::new(ScriptedModel::new(
        Some(REICHENBACH_DECISION),
        Some(digest),
        Some("Ah, the falls. I remember the roar of the water well, Watson."),
    ));
    let (strategy, calls) = ScriptedStrategy::boxed(Outcome::Found(reichenbach_results()));
    let pipeline = TurnPipeline::new(model.clone(), WebRetriever::new(vec![strategy]), config());

    let (result, stages) = run(
        &pipeline,
        request("Tell me about the Reichenbach Falls scene", true),
    )
    .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(result.search_performed);
    assert_eq!(result.search_query, "Reichenbach Falls Sherlock Holmes");
    assert_eq!(result.search_summary, digest);
    assert_eq!(result.search_results.len(), 3);
    assert!(result.reply.unwrap().contains("falls"));
    assert_eq!(result.tokens_used, 700);
    assert!((result.cost - 0.0055).abs() < 1e-12);
    assert_eq!(
        stages,
        vec![
            TurnStage::Deciding,
            TurnStage::Retrieving,
            TurnStage::Summarizing,
            TurnStage::Synthesizing,
            TurnStage::Done,
        ]
    );

    // decision, summary, reply
    let requests = model.requests();
    assert_eq!(requests.len(), 3);
    let reply_request = &requests[2];
    assert_eq!(reply_request.model, PRIMARY);
    assert_eq!(reply_request.max_tokens, Some(2000));
    assert_eq!(reply_request.messages[0].role, Role::System);
    assert!(reply_request.messages[0].content.contains(digest));
    assert_eq!(
        reply_request.messages.last().unwrap().content,
        "Tell me about the Reichenbach Falls scene"
    );
}

#[tokio::test]
async fn test_declined_decision_skips_retrieval() {
    let model = Arc::new(ScriptedModel::new(
        Some(r#"{"need_search": false, "search_query": "", "reason": "small talk"}"#),
        Some("unused"),
        Some("Good evening."),
    ));
    let (strategy, calls) = ScriptedStrategy::boxed(Outcome::Found(reichenbach_results()));
    let pipeline = TurnPipeline::new(model.clone(), WebRetriever::new(vec![strategy]), config());

    let (result, stages) = run(&pipeline, request("Good evening, Holmes", true)).await;

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!result.search_performed);
    assert!(result.search_query.is_empty());
    assert_eq!(result.reply.as_deref(), Some("Good evening."));
    assert_eq!(model.requests().len(), 2);
    assert_eq!(
        stages,
        vec![
            TurnStage::Deciding,
            TurnStage::Idle,
            TurnStage::Synthesizing,
            TurnStage::Done,
        ]
    );
    // No search context in the system prompt.
    let requests = model.requests();
    assert!(!requests[1].messages[0].content.contains("unused"));
}

#[tokio::test]
async fn test_search_disabled_makes_a_single_call() {
    let model = Arc::new(ScriptedModel::new(
        Some(REICHENBACH_DECISION),
        None,
        Some("Elementary."),
    ));
    let (strategy, calls) = ScriptedStrategy::boxed(Outcome::Found(reichenbach_results()));
    let pipeline = TurnPipeline::new(model.clone(), WebRetriever::new(vec![strategy]), config());

    let (result, stages) = run(
        &pipeline,
        request("Tell me about the Reichenbach Falls scene", false),
    )
    .await;

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!result.search_performed);
    assert_eq!(model.requests().len(), 1);
    assert_eq!(stages, vec![TurnStage::Synthesizing, TurnStage::Done]);
}

#[tokio::test]
async fn test_malformed_decision_fails_closed() {
    for raw in [
        "I think you should search",
        r#"{"need_search": true, "search_query": "   "}"#,
    ] {
        let model = Arc::new(ScriptedModel::new(Some(raw), None, Some("Hmm.")));
        let (strategy, calls) = ScriptedStrategy::boxed(Outcome::Found(reichenbach_results()));
        let pipeline =
            TurnPipeline::new(model.clone(), WebRetriever::new(vec![strategy]), config());

        let (result, _) = run(&pipeline, request("Where is Baker Street?", true)).await;

        assert_eq!(calls.load(Ordering::SeqCst), 0, "decision: {raw}");
        assert!(!result.search_performed);
        assert_eq!(result.reply.as_deref(), Some("Hmm."));
    }
}

#[tokio::test]
async fn test_empty_retrieval_skips_summary_call() {
    let model = Arc::new(ScriptedModel::new(
        Some(REICHENBACH_DECISION),
        Some("should not be requested"),
        Some("I have no data, and it is a capital mistake to theorize without it."),
    ));
    let (strategy, calls) = ScriptedStrategy::boxed(Outcome::Empty);
    let pipeline = TurnPipeline::new(model.clone(), WebRetriever::new(vec![strategy]), config());

    let (result, _) = run(
        &pipeline,
        request("Tell me about the Reichenbach Falls scene", true),
    )
    .await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(result.search_performed);
    assert!(result.search_results.is_empty());
    assert_eq!(result.search_summary, NO_INFORMATION);
    assert!(result.reply.is_some());
    // decision and reply only
    assert_eq!(model.requests().len(), 2);
}

#[tokio::test]
async fn test_summary_failure_falls_back_to_snippets() {
    let model = Arc::new(ScriptedModel::new(
        Some(REICHENBACH_DECISION),
        None,
        Some("Indeed."),
    ));
    let (strategy, _) = ScriptedStrategy::boxed(Outcome::Found(reichenbach_results()));
    let pipeline = TurnPipeline::new(model.clone(), WebRetriever::new(vec![strategy]), config());

    let (result, _) = run(
        &pipeline,
        request("Tell me about the Reichenbach Falls scene", true),
    )
    .await;

    assert_eq!(result.search_summary, turn::snippet_fallback(&reichenbach_results()));
    assert!(result.search_summary.contains("Bernese Oberland"));
    assert_eq!(result.reply.as_deref(), Some("Indeed."));
}

#[tokio::test]
async fn test_repeated_query_hits_cache() {
    let model = Arc::new(ScriptedModel::new(
        Some(REICHENBACH_DECISION),
        Some("A digest."),
        Some("Quite so."),
    ));
    let (strategy, calls) = ScriptedStrategy::boxed(Outcome::Found(reichenbach_results()));
    let pipeline = TurnPipeline::new(model.clone(), WebRetriever::new(vec![strategy]), config());

    let (first, _) = run(&pipeline, request("What happened at the falls?", true)).await;
    let (second, stages) = run(&pipeline, request("And at the falls again?", true)).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(first.search_summary, second.search_summary);
    assert_eq!(first.search_results, second.search_results);
    assert!(second.search_performed);
    assert!(!stages.contains(&TurnStage::Retrieving));
    assert!(!stages.contains(&TurnStage::Summarizing));
    assert_eq!(pipeline.cache().lock().await.len(), 1);
    // decision + summary + reply, then decision + reply
    assert_eq!(model.requests().len(), 5);
}

#[tokio::test]
async fn test_empty_outcome_is_cached_too() {
    let model = Arc::new(ScriptedModel::new(
        Some(REICHENBACH_DECISION),
        None,
        Some("No trace."),
    ));
    let (strategy, calls) = ScriptedStrategy::boxed(Outcome::Empty);
    let pipeline = TurnPipeline::new(model, WebRetriever::new(vec![strategy]), config());

    run(&pipeline, request("first", true)).await;
    let (second, _) = run(&pipeline, request("second", true)).await;

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(second.search_summary, NO_INFORMATION);
}

#[tokio::test]
async fn test_synthesis_failure_leaves_session_untouched() {
    let model = Arc::new(ScriptedModel::new(
        Some(REICHENBACH_DECISION),
        Some("A digest."),
        None,
    ));
    let (strategy, _) = ScriptedStrategy::boxed(Outcome::Found(reichenbach_results()));
    let pipeline = TurnPipeline::new(model, WebRetriever::new(vec![strategy]), config());

    let mut session = SessionState::new(true);
    session.select_persona("sherlock").unwrap();
    session.messages.push(ChatMessage::user("Hello"));
    session.messages.push(ChatMessage::assistant("Good day."));

    let (result, stages) = run(
        &pipeline,
        request("Tell me about the Reichenbach Falls scene", true),
    )
    .await;

    assert!(result.reply.is_none());
    assert!(result.error.is_some());
    assert_eq!(result.tokens_used, 0);
    assert_eq!(result.cost, 0.0);
    assert_eq!(stages.last(), Some(&TurnStage::Done));

    assert!(!session.apply_turn("Tell me about the Reichenbach Falls scene", &result));
    assert_eq!(session.messages.len(), 2);
    assert_eq!(session.total_tokens, 0);
    assert_eq!(session.search_count(), 0);
}

#[tokio::test]
async fn test_history_is_sent_in_order() {
    let model = Arc::new(ScriptedModel::new(None, None, Some("Yes.")));
    let pipeline = TurnPipeline::new(model.clone(), WebRetriever::new(Vec::new()), config());

    let mut turn = request("And then?", false);
    turn.history = vec![
        ChatMessage::user("Who is Moriarty?"),
        ChatMessage::assistant("The Napoleon of crime."),
    ];
    run(&pipeline, turn).await;

    let requests = model.requests();
    let messages = &requests[0].messages;
    let roles: Vec<Role> = messages.iter().map(|m| m.role).collect();
    assert_eq!(
        roles,
        vec![Role::System, Role::User, Role::Assistant, Role::User]
    );
    assert_eq!(messages[1].content, "Who is Moriarty?");
    assert_eq!(messages[3].content, "And then?");
}

#[tokio::test]
async fn test_retriever_falls_through_strategies_in_order() {
    let (failing, failing_calls) = ScriptedStrategy::boxed(Outcome::Fail);
    let (empty, empty_calls) = ScriptedStrategy::boxed(Outcome::Empty);
    let (found, found_calls) = ScriptedStrategy::boxed(Outcome::Found(reichenbach_results()));
    let (unused, unused_calls) = ScriptedStrategy::boxed(Outcome::Found(Vec::new()));
    let retriever = WebRetriever::new(vec![failing, empty, found, unused]);

    let results = retriever.retrieve("Reichenbach Falls", 2).await;

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].title, "Reichenbach Falls");
    assert_eq!(failing_calls.load(Ordering::SeqCst), 1);
    assert_eq!(empty_calls.load(Ordering::SeqCst), 1);
    assert_eq!(found_calls.load(Ordering::SeqCst), 1);
    assert_eq!(unused_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_exhausted_retriever_returns_nothing() {
    let (a, _) = ScriptedStrategy::boxed(Outcome::Fail);
    let (b, _) = ScriptedStrategy::boxed(Outcome::Empty);
    let retriever = WebRetriever::new(vec![a, b]);

    assert!(retriever.retrieve("anything", 5).await.is_empty());
    assert_eq!(WebRetriever::duckduckgo(reqwest::Client::new()).strategy_count(), 3);
}

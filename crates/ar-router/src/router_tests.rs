use super::*;
use ar_core::model::{ModelCapabilities, ModelPricing};

fn model(id: &str, provider: &str, tier: QualityTier, input_price: f64, output_price: f64, tasks: &[TaskType]) -> Model {
    Model {
        model_id: id.to_string(),
        provider: provider.to_string(),
        capabilities: ModelCapabilities {
            tools: true,
            vision: false,
            streaming: true,
            embedding: tasks == [TaskType::Embedding],
        },
        context_window: 128_000,
        max_output_tokens: 8_192,
        pricing: ModelPricing {
            input_price_per_1m: input_price,
            output_price_per_1m: output_price,
            cached_input_price_per_1m: None,
        },
        quality_tier: tier,
        suitable_for: tasks.to_vec(),
        available: true,
    }
}

fn catalog() -> Vec<Model> {
    vec![
        model(
            "claude-sonnet-4-20250514",
            "anthropic",
            QualityTier::Standard,
            3.0,
            15.0,
            &[TaskType::Coding, TaskType::Planning, TaskType::Review],
        ),
        model("gpt-4o", "openai", QualityTier::Standard, 2.5, 10.0, &[TaskType::Coding, TaskType::Planning, TaskType::Review]),
        model("deepseek-chat", "deepseek", QualityTier::Standard, 0.27, 1.1, &[TaskType::Coding]),
        model("gemini-2.0-pro", "google", QualityTier::Standard, 1.25, 5.0, &[TaskType::Coding, TaskType::Planning]),
    ]
}

#[test]
fn coding_under_full_availability_picks_the_default_rule_model() {
    let router = TaskRouter::new();
    let request = TaskRoutingRequest::new(TaskType::Coding, "w");
    let config = WorkspaceRoutingConfig::new(
        "w",
        vec!["anthropic".into(), "openai".into(), "google".into(), "deepseek".into()],
    );
    let decision = router.route_task(&catalog(), &request, &config).unwrap();
    assert_eq!(decision.selected_model, "claude-sonnet-4-20250514");
    assert_eq!(decision.provider, "anthropic");
    assert!((decision.estimated_cost - 0.0105).abs() < 1e-6);
}

#[test]
fn coding_falls_back_to_the_next_available_provider() {
    let router = TaskRouter::new();
    let request = TaskRoutingRequest::new(TaskType::Coding, "w");
    let config = WorkspaceRoutingConfig::new("w", vec!["openai".into(), "google".into(), "deepseek".into()]);
    let decision = router.route_task(&catalog(), &request, &config).unwrap();
    assert_eq!(decision.selected_model, "gpt-4o");
    assert_eq!(decision.provider, "openai");
}

#[test]
fn empty_enabled_providers_is_an_immediate_routing_error() {
    let router = TaskRouter::new();
    let request = TaskRoutingRequest::new(TaskType::Coding, "w");
    let config = WorkspaceRoutingConfig::new("w", vec![]);
    let err = router.route_task(&catalog(), &request, &config).unwrap_err();
    assert_eq!(err.task_type, TaskType::Coding);
}

#[test]
fn force_model_wins_even_with_capability_mismatch_but_notes_a_warning() {
    let router = TaskRouter::new();
    let mut request = TaskRoutingRequest::new(TaskType::Coding, "w");
    request.force_model = Some("claude-sonnet-4-20250514".into());
    request.requires_vision = true;
    let config = WorkspaceRoutingConfig::new("w", vec!["anthropic".into()]);
    let decision = router.route_task(&catalog(), &request, &config).unwrap();
    assert_eq!(decision.selected_model, "claude-sonnet-4-20250514");
    assert!(decision.reason.contains("warning"));
}

#[test]
fn force_provider_picks_cheapest_suitable_model_from_that_provider() {
    let router = TaskRouter::new();
    let mut request = TaskRoutingRequest::new(TaskType::Coding, "w");
    request.force_provider = Some("anthropic".into());
    let config = WorkspaceRoutingConfig::new("w", vec!["anthropic".into()]);
    let decision = router.route_task(&catalog(), &request, &config).unwrap();
    assert_eq!(decision.provider, "anthropic");
}

#[test]
fn estimate_cost_is_negative_one_for_unknown_model() {
    assert_eq!(estimate_cost(&catalog(), "does-not-exist", 1000, 500), -1.0);
}

#[test]
fn capability_check_rejects_embedding_only_models_for_non_embedding_tasks() {
    let embedding_model = model("text-embedding-3-small", "openai", QualityTier::Economy, 0.02, 0.0, &[TaskType::Embedding]);
    assert!(!capability_check(&embedding_model, &TaskRoutingRequest::new(TaskType::Coding, "w")));
}

#[test]
fn capability_check_requires_context_window_to_cover_request() {
    let mut request = TaskRoutingRequest::new(TaskType::Coding, "w");
    request.context_size_tokens = Some(200_000);
    let small_context = model("small-model", "openai", QualityTier::Standard, 1.0, 2.0, &[TaskType::Coding]);
    assert!(!capability_check(&small_context, &request));
}

proptest::proptest! {
    #[test]
    fn estimate_cost_is_non_negative_and_linear_in_tokens(
        input_price in 0.0f64..100.0,
        output_price in 0.0f64..100.0,
        input_tokens in 0u64..1_000_000,
        output_tokens in 0u64..1_000_000,
    ) {
        let models = vec![model("m", "anthropic", QualityTier::Standard, input_price, output_price, &[TaskType::Coding])];
        let cost = estimate_cost(&models, "m", input_tokens, output_tokens);
        proptest::prop_assert!(cost >= 0.0);

        let doubled = estimate_cost(&models, "m", input_tokens * 2, output_tokens * 2);
        proptest::prop_assert!((doubled - cost * 2.0).abs() < 1e-6);
    }
}

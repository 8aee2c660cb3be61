//! Profile catalog loading and form resolution

use ai_carbon_rust::emissions::{calculate_from_form_data, estimate, CalculationForm};
use ai_carbon_rust::profiles::{ProfileCatalog, ProfileLookup, SharedCatalog};
use ai_carbon_rust::{Error, ProfileKind};

const CATALOG_JSON: &str = r#"{
  "hardware": [
    { "id": "edge-gpu", "powerWatts": 60, "tokensPerSecond": 150 }
  ],
  "dataCenters": [
    { "id": "on-prem", "pue": 1.4, "carbonIntensity": 0.35 }
  ],
  "models": [
    {
      "id": "llama-3-8b",
      "parameters": 8000000000,
      "contextLength": 8192,
      "complexityFactor": 0.3,
      "tokenWeights": {
        "inputWithCache": 1.0,
        "inputWithoutCache": 1.0,
        "cacheRead": 0.2,
        "outputTokens": 3.0
      }
    }
  ]
}"#;

fn write_temp(name: &str, content: &str) -> std::path::PathBuf {
    let path = std::env::temp_dir().join(format!("ai-carbon-{}-{}", std::process::id(), name));
    std::fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_json_catalog_from_path() {
    let path = write_temp("catalog.json", CATALOG_JSON);
    let catalog = ProfileCatalog::from_path(&path);
    let _ = std::fs::remove_file(&path);

    let catalog = catalog.unwrap();
    let model = catalog.model("llama-3-8b").unwrap();
    assert_eq!(model.parameters(), Some(8_000_000_000));
    assert_eq!(model.token_weights().unwrap().output_tokens, 3.0);
}

#[test]
fn test_yaml_catalog_from_path() {
    let yaml = r#"
hardware:
  - id: edge-gpu
    powerWatts: 60
    tokensPerSecond: 150
"#;
    let path = write_temp("catalog.yaml", yaml);
    let catalog = ProfileCatalog::from_path(&path);
    let _ = std::fs::remove_file(&path);

    assert_eq!(catalog.unwrap().hardware("edge-gpu").unwrap().power_watts(), 60.0);
}

#[test]
fn test_missing_file_is_io_error() {
    let err = ProfileCatalog::from_path("/nonexistent/ai-carbon/catalog.yaml").unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_form_by_ids_matches_inline_request() {
    let catalog = ProfileCatalog::from_json_str(CATALOG_JSON).unwrap();

    let mut form = CalculationForm::by_ids("edge-gpu", "on-prem", "llama-3-8b");
    form.token_count = Some(2_000);
    form.context_window = Some(4096);

    let via_form = calculate_from_form_data(form.clone(), &catalog).unwrap();
    let via_request = estimate(&form.resolve(&catalog).unwrap());
    assert_eq!(via_form, via_request);
}

#[test]
fn test_form_json_with_inline_model() {
    let catalog = ProfileCatalog::builtin().unwrap();
    let form: CalculationForm = serde_json::from_str(
        r#"{
            "hardware": "nvidia-h100",
            "dataCenter": "eu-north",
            "model": { "id": "custom", "contextLength": 32000, "complexityFactor": 0.8 },
            "tokenCount": 1000,
            "customPue": 1.3
        }"#,
    )
    .unwrap();
    let request = form.resolve(&catalog).unwrap();
    assert_eq!(request.model.id(), "custom");
    assert_eq!(request.context_window, 32_000);
    assert_eq!(request.effective_pue(), 1.3);
}

#[test]
fn test_unknown_hardware_is_reported_by_kind() {
    let catalog = ProfileCatalog::builtin().unwrap();
    let mut form = CalculationForm::by_ids("tpu-v9", "us-west", "gpt-4");
    form.token_count = Some(1);
    match calculate_from_form_data(form, &catalog) {
        Err(Error::ProfileNotFound { kind, id }) => {
            assert_eq!(kind, ProfileKind::Hardware);
            assert_eq!(id, "tpu-v9");
        }
        other => panic!("expected ProfileNotFound, got {:?}", other),
    }
}

#[test]
fn test_shared_catalog_reload_from_path() {
    let shared = SharedCatalog::new(ProfileCatalog::builtin().unwrap());
    assert!(shared.model("llama-3-8b").is_none());

    let path = write_temp("reload.json", CATALOG_JSON);
    let reloaded = shared.reload_from_path(&path);
    let _ = std::fs::remove_file(&path);
    reloaded.unwrap();

    assert!(shared.model("llama-3-8b").is_some());
    assert!(shared.model("gpt-4").is_none());
}

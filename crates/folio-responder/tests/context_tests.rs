use std::fs;
use std::sync::Arc;

use async_trait::async_trait;
use figment::providers::{Format, Toml};
use figment::Figment;

use folio_core::config::Config;
use folio_core::traits::VectorIndex;
use folio_responder::{AppContext, CompletionError, LanguageModel, PromptSpec};

struct EchoModel;

#[async_trait]
impl LanguageModel for EchoModel {
    async fn complete(&self, prompt: &PromptSpec) -> Result<String, CompletionError> {
        Ok(prompt.user_message())
    }
}

const CONFIG: &str = r#"
[data]
resume_path = "resume.txt"
publications_path = "publications.json"

[embedding]
backend = "hash"

[retrieval]
top_k = 1

[responder]
subject_name = "Ada"
"#;

fn write_fixture(dir: &std::path::Path) {
    fs::write(dir.join("resume.txt"), "Skills: Python, SQL\n---\nExperience: 2 years at Acme Corp\n---\nPublications: none").unwrap();
    fs::write(dir.join("publications.json"), r#"[{"title": "Paper A", "link": "http://x"}]"#).unwrap();
}

#[tokio::test]
async fn bootstrap_builds_a_working_responder() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());
    let config = Config::from_figment(Figment::new().merge(Toml::string(CONFIG)), tmp.path()).unwrap();

    let ctx = AppContext::bootstrap_with(&config, Arc::new(EchoModel)).unwrap();
    assert_eq!(ctx.index.len(), 3);
    assert_eq!(ctx.side_data.publications().len(), 1);

    let responder = ctx.responder();
    assert!(responder.respond("What are the skills?").await.contains("Python, SQL"));
    assert!(responder.respond("Any publications?").await.contains("- Paper A (http://x)"));
}

#[test]
fn missing_resume_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let config = Config::from_figment(Figment::new().merge(Toml::string(CONFIG)), tmp.path()).unwrap();
    assert!(AppContext::bootstrap_with(&config, Arc::new(EchoModel)).is_err());
}

#[test]
fn empty_resume_boots_with_null_index() {
    let tmp = tempfile::tempdir().unwrap();
    write_fixture(tmp.path());
    fs::write(tmp.path().join("resume.txt"), "").unwrap();
    let config = Config::from_figment(Figment::new().merge(Toml::string(CONFIG)), tmp.path()).unwrap();
    let ctx = AppContext::bootstrap_with(&config, Arc::new(EchoModel)).unwrap();
    assert!(ctx.index.is_empty());
}

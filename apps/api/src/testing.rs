// Test doubles for the external model provider and the browser agent.
//
// Both stubs are deterministic: their output is fully decided by how they are built,
// and every call is recorded for assertions.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use crate::browser::{BrowserError, BrowserSession, BrowsingAgent, LaunchOptions, SessionHandle};
use crate::llm_client::{FileRef, GenerationRequest, GenerativeModel, LlmError};

// =============================================================================
// Stub Model
// =============================================================================

pub struct StubModel {
    response: Option<String>,
    fail_delete: bool,
    requests: Mutex<Vec<GenerationRequest>>,
    uploads: Mutex<Vec<PathBuf>>,
    deleted: Mutex<Vec<FileRef>>,
}

impl StubModel {
    /// Echoes `text` for any prompt.
    pub fn responding(text: &str) -> Self {
        Self::with_response(Some(text.to_string()))
    }

    pub fn responding_json(value: Value) -> Self {
        Self::responding(&value.to_string())
    }

    /// Succeeds but produces no text.
    pub fn empty() -> Self {
        Self::with_response(None)
    }

    fn with_response(response: Option<String>) -> Self {
        Self {
            response,
            fail_delete: false,
            requests: Mutex::new(Vec::new()),
            uploads: Mutex::new(Vec::new()),
            deleted: Mutex::new(Vec::new()),
        }
    }

    pub fn failing_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    pub fn requests(&self) -> Vec<GenerationRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn uploads(&self) -> Vec<PathBuf> {
        self.uploads.lock().unwrap().clone()
    }

    pub fn deleted(&self) -> Vec<FileRef> {
        self.deleted.lock().unwrap().clone()
    }

    pub fn uploaded_file() -> FileRef {
        FileRef {
            name: "files/stub-resume".to_string(),
            uri: "https://files.example.com/v1beta/files/stub-resume".to_string(),
            mime_type: "application/pdf".to_string(),
        }
    }
}

#[async_trait]
impl GenerativeModel for StubModel {
    async fn generate_structured_content(
        &self,
        request: GenerationRequest,
    ) -> Result<Option<String>, LlmError> {
        self.requests.lock().unwrap().push(request);
        Ok(self.response.clone())
    }

    async fn upload_file(&self, path: &Path) -> Result<FileRef, LlmError> {
        self.uploads.lock().unwrap().push(path.to_path_buf());
        Ok(Self::uploaded_file())
    }

    async fn delete_file(&self, file: &FileRef) -> Result<(), LlmError> {
        self.deleted.lock().unwrap().push(file.clone());
        if self.fail_delete {
            return Err(LlmError::Api {
                status: 404,
                message: "file not found".to_string(),
            });
        }
        Ok(())
    }
}

// =============================================================================
// Stub Agent
// =============================================================================

#[derive(Debug, Clone)]
enum Navigation {
    Succeed,
    Fail(String),
    Hang,
}

pub struct StubAgent {
    extraction: Value,
    navigation: Navigation,
    fail_launch: bool,
    fail_close: bool,
    pub close_calls: Arc<AtomicUsize>,
    actions: Arc<Mutex<Vec<String>>>,
    launches: Mutex<Vec<LaunchOptions>>,
}

impl StubAgent {
    /// Extraction reports `SUCCESS` with `data`.
    pub fn succeeding(data: &str) -> Self {
        Self::extracting(json!({ "message": "SUCCESS", "data": data }))
    }

    /// Extraction reports `ERROR` with `data` as the reason.
    pub fn reporting_error(data: &str) -> Self {
        Self::extracting(json!({ "message": "ERROR", "data": data }))
    }

    pub fn extracting(extraction: Value) -> Self {
        Self {
            extraction,
            navigation: Navigation::Succeed,
            fail_launch: false,
            fail_close: false,
            close_calls: Arc::new(AtomicUsize::new(0)),
            actions: Arc::new(Mutex::new(Vec::new())),
            launches: Mutex::new(Vec::new()),
        }
    }

    /// Navigation never completes.
    pub fn hanging_navigation(mut self) -> Self {
        self.navigation = Navigation::Hang;
        self
    }

    pub fn failing_navigation(mut self, message: &str) -> Self {
        self.navigation = Navigation::Fail(message.to_string());
        self
    }

    pub fn failing_launch(mut self) -> Self {
        self.fail_launch = true;
        self
    }

    pub fn failing_close(mut self) -> Self {
        self.fail_close = true;
        self
    }

    pub fn closes(&self) -> usize {
        self.close_calls.load(Ordering::SeqCst)
    }

    pub fn actions(&self) -> Vec<String> {
        self.actions.lock().unwrap().clone()
    }

    pub fn launches(&self) -> Vec<LaunchOptions> {
        self.launches.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrowsingAgent for StubAgent {
    async fn launch(&self, options: &LaunchOptions) -> Result<SessionHandle, BrowserError> {
        self.launches.lock().unwrap().push(options.clone());
        if self.fail_launch {
            return Err(BrowserError::Agent {
                status: 503,
                message: "no browsers available".to_string(),
            });
        }
        Ok(Box::new(StubSession {
            extraction: self.extraction.clone(),
            navigation: self.navigation.clone(),
            fail_close: self.fail_close,
            close_calls: Arc::clone(&self.close_calls),
            actions: Arc::clone(&self.actions),
        }))
    }
}

struct StubSession {
    extraction: Value,
    navigation: Navigation,
    fail_close: bool,
    close_calls: Arc<AtomicUsize>,
    actions: Arc<Mutex<Vec<String>>>,
}

impl StubSession {
    fn record(&self, action: String) {
        self.actions.lock().unwrap().push(action);
    }
}

#[async_trait]
impl BrowserSession for StubSession {
    async fn navigate(&mut self, url: &str, _timeout: Duration) -> Result<(), BrowserError> {
        self.record(format!("navigate {url}"));
        match &self.navigation {
            Navigation::Succeed => Ok(()),
            Navigation::Fail(message) => Err(BrowserError::Rejected(message.clone())),
            Navigation::Hang => std::future::pending().await,
        }
    }

    async fn act(&mut self, instruction: &str) -> Result<(), BrowserError> {
        self.record(format!("act {instruction}"));
        Ok(())
    }

    async fn extract(
        &mut self,
        _instruction: &str,
        _schema: &Value,
        model: &str,
    ) -> Result<Value, BrowserError> {
        self.record(format!("extract {model}"));
        Ok(self.extraction.clone())
    }

    async fn close(&mut self) -> Result<(), BrowserError> {
        self.close_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(BrowserError::Rejected("session already ended".to_string()));
        }
        Ok(())
    }
}

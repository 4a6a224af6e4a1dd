use async_trait::async_trait;
use contacts_backend::client::{AsyncImageHost, UploadedImage};
use contacts_backend::error::{ImageHostError, ImageHostResult};
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

/// Mock image host for testing.
///
/// Hands out sequential public ids, remembers destroyed assets and tracks
/// method calls for verification. Uploads can be made to fail on demand.
#[allow(dead_code)]
#[derive(Clone, Default)]
pub struct MockImageHost {
    next_id: Arc<Mutex<usize>>,
    destroyed: Arc<Mutex<Vec<String>>>,
    call_counts: Arc<Mutex<HashMap<String, usize>>>,
    fail_uploads: Arc<AtomicBool>,
}

#[allow(dead_code)]
impl MockImageHost {
    /// Create a new MockImageHost.
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent upload fail with a server error.
    pub fn fail_uploads(&self, fail: bool) {
        self.fail_uploads.store(fail, Ordering::SeqCst);
    }

    /// Get the number of times a method was called.
    pub fn get_call_count(&self, method: &str) -> usize {
        let counts = self.call_counts.lock().unwrap();
        *counts.get(method).unwrap_or(&0)
    }

    /// Public ids passed to `destroy`, in call order.
    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }

    fn track_call(&self, method: &str) {
        let mut counts = self.call_counts.lock().unwrap();
        *counts.entry(method.to_string()).or_insert(0) += 1;
    }

    fn check_upload(&self, path: &Path) -> ImageHostResult<()> {
        if self.fail_uploads.load(Ordering::SeqCst) {
            return Err(ImageHostError::ApiError {
                status: 500,
                message: "mock upload failure".to_string(),
            });
        }
        // Read the file like the real client does
        std::fs::read(path)?;
        Ok(())
    }
}

#[async_trait]
impl AsyncImageHost for MockImageHost {
    async fn upload(&self, path: &Path) -> ImageHostResult<UploadedImage> {
        self.track_call("upload");
        self.check_upload(path)?;

        let mut next = self.next_id.lock().unwrap();
        *next += 1;
        let public_id = format!("contacts/mock-{}", *next);
        Ok(UploadedImage {
            secure_url: format!("https://images.test/{}.jpg", public_id),
            public_id,
        })
    }

    async fn upload_overwrite(
        &self,
        public_id: &str,
        path: &Path,
    ) -> ImageHostResult<UploadedImage> {
        self.track_call("upload_overwrite");
        self.check_upload(path)?;

        let version = self.get_call_count("upload_overwrite");
        Ok(UploadedImage {
            public_id: public_id.to_string(),
            secure_url: format!("https://images.test/v{}/{}.jpg", version, public_id),
        })
    }

    async fn destroy(&self, public_id: &str) -> ImageHostResult<()> {
        self.track_call("destroy");
        self.destroyed.lock().unwrap().push(public_id.to_string());
        Ok(())
    }
}

//! Pipeline stage trait

use crate::error::Result;
use async_trait::async_trait;

/// A single typed stage of the analysis pipeline
///
/// Stages run sequentially; the output of one becomes the input of the
/// next. Keeping the seam as a trait lets tests substitute any stage.
#[async_trait]
pub trait Stage: Send + Sync {
    type Input: Send;
    type Output: Send;

    /// Run the stage
    async fn run(&self, input: Self::Input) -> Result<Self::Output>;

    /// Get the stage's name
    fn name(&self) -> &str;
}

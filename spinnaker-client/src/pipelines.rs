//! Pipeline config endpoints

use crate::GateClient;
use crate::error::Result;
use reqwest::StatusCode;
use spinnaker_core::PipelineDocument;

impl GateClient {
    // =============================================================================
    // Pipeline Management
    // =============================================================================

    /// Save a new pipeline
    ///
    /// Gate rejects the save with "A pipeline with name ... already exists"
    /// when the application already has a pipeline under that name.
    pub async fn create_pipeline(&self, pipeline: &PipelineDocument) -> Result<()> {
        let url = self.endpoint(&["pipelines"])?;
        let response = self
            .send("create_pipeline", || self.client.post(url.clone()).json(pipeline))
            .await?;

        self.handle_empty_response(response, &[StatusCode::OK]).await
    }

    /// Get a pipeline config by application and pipeline name
    ///
    /// # Returns
    /// The document as stored by Gate, including the fields it manages
    pub async fn get_pipeline(
        &self,
        application: &str,
        pipeline_name: &str,
    ) -> Result<PipelineDocument> {
        let url = self.endpoint(&["applications", application, "pipelineConfigs", pipeline_name])?;
        let response = self
            .send("get_pipeline", || self.client.get(url.clone()))
            .await?;

        self.handle_response(response, &[StatusCode::OK]).await
    }

    /// Replace the pipeline with the given ID
    pub async fn update_pipeline(
        &self,
        pipeline_id: &str,
        pipeline: &PipelineDocument,
    ) -> Result<()> {
        let url = self.endpoint(&["pipelines", pipeline_id])?;
        let response = self
            .send("update_pipeline", || self.client.put(url.clone()).json(pipeline))
            .await?;

        self.handle_empty_response(response, &[StatusCode::OK]).await
    }

    /// Delete a pipeline by application and pipeline name
    pub async fn delete_pipeline(&self, application: &str, pipeline_name: &str) -> Result<()> {
        let url = self.endpoint(&["pipelines", application, pipeline_name])?;
        let response = self
            .send("delete_pipeline", || self.client.delete(url.clone()))
            .await?;

        self.handle_empty_response(response, &[StatusCode::OK]).await
    }

    /// Delete a pipeline and save it again
    ///
    /// Not atomic: if the save fails the pipeline stays deleted and the
    /// save error is returned.
    pub async fn recreate_pipeline(
        &self,
        application: &str,
        pipeline_name: &str,
        pipeline: &PipelineDocument,
    ) -> Result<()> {
        self.delete_pipeline(application, pipeline_name).await?;
        self.create_pipeline(pipeline).await
    }
}

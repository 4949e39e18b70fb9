use utoipa::OpenApi;

pub const CRONJOB_TAG: &str = "CronJobs";
pub const HEALTH_TAG: &str = "Health";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "chronod",
        description = "HTTP cron-job scheduling API",
    ),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
        )
    ),
    tags(
        (name = CRONJOB_TAG, description = "Cron job management endpoints"),
        (name = HEALTH_TAG, description = "Health check endpoints"),
    )
)]
pub struct ApiDoc;

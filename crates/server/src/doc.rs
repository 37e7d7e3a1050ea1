use utoipa::OpenApi;

/// API Documentation
///
/// Paths are registered by the router in [`crate::routes::router`].
#[derive(OpenApi)]
#[openapi(
    tags(
        (name = "Health", description = "Service health"),
        (name = "Prerequisites", description = "Resolved prerequisites and expanded trees"),
    ),
    info(
        title = "Prerequisite API",
        version = "1.0.0",
        description = "Course prerequisite lookup and expansion",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Socks Inventory API",
        version = "1.0.0",
        description = r#"
Inventory accounting for sock stock-keeping units identified by color and
cotton percentage.

- **Income/outcome**: register arrivals (merged into existing stock) and
  departures (which may exhaust a record)
- **Aggregate queries**: total amount under a color + operator + threshold filter
- **Filtered listing**: cotton percentage range with optional sorting
- **Batch import**: bulk creation from an uploaded CSV file
        "#
    ),
    paths(
        crate::handlers::socks::register_income,
        crate::handlers::socks::register_outcome,
        crate::handlers::socks::get_socks_amount,
        crate::handlers::socks::update_sock,
        crate::handlers::socks::upload_batch,
        crate::handlers::socks::filter_by_cotton,
        crate::handlers::health::health_check,
    ),
    components(schemas(
        crate::handlers::socks::SockRequest,
        crate::handlers::socks::UpdateSockRequest,
        crate::handlers::socks::SockResponse,
        crate::handlers::socks::AmountResponse,
        crate::handlers::socks::SocksList,
        crate::errors::ErrorResponse,
    )),
    tags(
        (name = "socks", description = "Sock inventory endpoints"),
        (name = "health", description = "Service health")
    )
)]
pub struct ApiDoc;

/// Swagger UI mounted at /swagger-ui, serving the generated document
pub fn swagger_ui() -> SwaggerUi {
    SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi())
}

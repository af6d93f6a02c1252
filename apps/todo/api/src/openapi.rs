use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    components(schemas(axum_helpers::ErrorResponse)),
    info(
        title = "Todo API",
        version = "0.1.0",
        description = "CRUD and filtered listing for todo items"
    ),
    nest((path = "/todos", api = domain_todos::TodosApiDoc))
)]
pub struct ApiDoc;

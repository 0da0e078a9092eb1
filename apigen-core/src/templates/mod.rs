//! The template catalog.
//!
//! Each [`TemplateId`] maps to one fixed body with `{{placeholder}}` slots.
//! Rendering is strict: a slot without a value is an error, never an empty
//! string.
//!
//! The bodies encode the layered convention the generated code relies on:
//! controllers call services, services call repositories, repositories extend
//! `BaseRepository{Version}`, models extend `ModelBase`. Member names and
//! parameter order are cross-referenced between templates and must stay in
//! sync.

mod base;
mod resource;
mod stubs;

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::naming::ResourceIdentity;
use crate::GenerateError;

/// Identifies one template body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TemplateId {
    ModelBase,
    QueryFilter,
    BaseRepositoryInterface,
    BaseRepository,
    ApiRenderableException,
    ApiResponses,
    ApiController,
    Model,
    Repository,
    Dto,
    Exception,
    Service,
    Filter,
    Controller,
    RouteFragment,
    RouteGroup,
    RoutesFile,
    ModelStub,
    Migration,
    FormRequest,
    JsonResource,
}

impl TemplateId {
    pub fn name(self) -> &'static str {
        match self {
            TemplateId::ModelBase => "model-base",
            TemplateId::QueryFilter => "query-filter",
            TemplateId::BaseRepositoryInterface => "base-repository-interface",
            TemplateId::BaseRepository => "base-repository",
            TemplateId::ApiRenderableException => "api-renderable-exception",
            TemplateId::ApiResponses => "api-responses",
            TemplateId::ApiController => "api-controller",
            TemplateId::Model => "model",
            TemplateId::Repository => "repository",
            TemplateId::Dto => "dto",
            TemplateId::Exception => "exception",
            TemplateId::Service => "service",
            TemplateId::Filter => "filter",
            TemplateId::Controller => "controller",
            TemplateId::RouteFragment => "route-fragment",
            TemplateId::RouteGroup => "route-group",
            TemplateId::RoutesFile => "routes-file",
            TemplateId::ModelStub => "model-stub",
            TemplateId::Migration => "migration",
            TemplateId::FormRequest => "form-request",
            TemplateId::JsonResource => "json-resource",
        }
    }

    /// The raw template body.
    pub fn source(self) -> &'static str {
        match self {
            TemplateId::ModelBase => base::MODEL_BASE,
            TemplateId::QueryFilter => base::QUERY_FILTER,
            TemplateId::BaseRepositoryInterface => base::BASE_REPOSITORY_INTERFACE,
            TemplateId::BaseRepository => base::BASE_REPOSITORY,
            TemplateId::ApiRenderableException => base::API_RENDERABLE_EXCEPTION,
            TemplateId::ApiResponses => base::API_RESPONSES,
            TemplateId::ApiController => base::API_CONTROLLER,
            TemplateId::Model => resource::MODEL,
            TemplateId::Repository => resource::REPOSITORY,
            TemplateId::Dto => resource::DTO,
            TemplateId::Exception => resource::EXCEPTION,
            TemplateId::Service => resource::SERVICE,
            TemplateId::Filter => resource::FILTER,
            TemplateId::Controller => resource::CONTROLLER,
            TemplateId::RouteFragment => resource::ROUTE_FRAGMENT,
            TemplateId::RouteGroup => resource::ROUTE_GROUP,
            TemplateId::RoutesFile => resource::ROUTES_FILE,
            TemplateId::ModelStub => stubs::MODEL,
            TemplateId::Migration => stubs::MIGRATION,
            TemplateId::FormRequest => stubs::FORM_REQUEST,
            TemplateId::JsonResource => stubs::JSON_RESOURCE,
        }
    }
}

/// Named values substituted into templates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateParams {
    values: BTreeMap<String, String>,
}

impl TemplateParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard parameter set for one resource:
    /// `rootNamespace`, `name`, `camelName`, `routeSegment`, `tableName`,
    /// `version` and `versionLower`.
    pub fn for_resource(identity: &ResourceIdentity, root_namespace: &str) -> Self {
        TemplateParams::new()
            .with("rootNamespace", root_namespace)
            .with("name", identity.pascal_name())
            .with("camelName", identity.camel_name())
            .with("routeSegment", identity.route_segment())
            .with("tableName", identity.table_name())
            .with("version", identity.version())
            .with("versionLower", identity.version_lower())
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.values.insert(key.into(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }
}

fn placeholder_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{\s*([A-Za-z][A-Za-z0-9_]*)\s*\}\}").expect("placeholder pattern is valid")
    })
}

/// Render a catalog template.
pub fn render(id: TemplateId, params: &TemplateParams) -> Result<String, GenerateError> {
    render_str(id.name(), id.source(), params)
}

/// Replace every `{{key}}` in `template` with its value from `params`.
///
/// Fails with [`GenerateError::MissingParam`] on the first placeholder that
/// has no value.
pub fn render_str(
    name: &'static str,
    template: &str,
    params: &TemplateParams,
) -> Result<String, GenerateError> {
    let mut output = String::with_capacity(template.len());
    let mut last = 0;
    for caps in placeholder_re().captures_iter(template) {
        let (Some(whole), Some(key)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let value = params
            .get(key.as_str())
            .ok_or_else(|| GenerateError::MissingParam {
                template: name,
                param: key.as_str().to_string(),
            })?;
        output.push_str(&template[last..whole.start()]);
        output.push_str(value);
        last = whole.end();
    }
    output.push_str(&template[last..]);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::naming::derive;

    const ALL: &[TemplateId] = &[
        TemplateId::ModelBase,
        TemplateId::QueryFilter,
        TemplateId::BaseRepositoryInterface,
        TemplateId::BaseRepository,
        TemplateId::ApiRenderableException,
        TemplateId::ApiResponses,
        TemplateId::ApiController,
        TemplateId::Model,
        TemplateId::Repository,
        TemplateId::Dto,
        TemplateId::Exception,
        TemplateId::Service,
        TemplateId::Filter,
        TemplateId::Controller,
        TemplateId::RouteFragment,
        TemplateId::RouteGroup,
        TemplateId::RoutesFile,
        TemplateId::ModelStub,
        TemplateId::Migration,
        TemplateId::FormRequest,
        TemplateId::JsonResource,
    ];

    fn params() -> TemplateParams {
        TemplateParams::for_resource(&derive("customer order", None).unwrap(), "App")
    }

    #[test]
    fn render_basic() {
        let p = TemplateParams::new().with("name", "Order").with("version", "V1");
        let out = render_str("t", "class {{name}}Controller{{ version }} {}", &p).unwrap();
        assert_eq!(out, "class OrderControllerV1 {}");
    }

    #[test]
    fn render_keeps_php_braces() {
        let p = TemplateParams::new().with("camelName", "order");
        let out = render_str("t", "fn() { return ${{camelName}}; }", &p).unwrap();
        assert_eq!(out, "fn() { return $order; }");
    }

    #[test]
    fn render_missing_param_fails() {
        let p = TemplateParams::new().with("name", "Order");
        let err = render_str("t", "{{name}} {{version}}", &p).unwrap_err();
        match err {
            GenerateError::MissingParam { template, param } => {
                assert_eq!(template, "t");
                assert_eq!(param, "version");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn every_template_renders_with_resource_params() {
        let p = params()
            .with("namespace", "App\\Http\\Requests\\Api\\V1\\CustomerOrder")
            .with("className", "StoreCustomerOrderRequestV1");
        for id in ALL {
            let out = render(*id, &p).unwrap();
            assert!(!out.contains("{{"), "{} left a placeholder", id.name());
        }
    }

    #[test]
    fn stub_templates_need_their_own_params() {
        let err = render(TemplateId::FormRequest, &params()).unwrap_err();
        assert!(matches!(err, GenerateError::MissingParam { .. }));
    }

    #[test]
    fn service_members() {
        let out = render(TemplateId::Service, &params()).unwrap();
        assert!(out.contains("class CustomerOrderServiceV1"));
        assert!(out.contains("public function getAllCustomerOrders($filters, $perPage)"));
        assert!(out.contains("public function getCustomerOrderById(CustomerOrder $customerOrder)"));
        assert!(out.contains("public function createCustomerOrder(CustomerOrderDTOV1 $dto)"));
        assert!(out.contains(
            "public function updateCustomerOrder(CustomerOrder $customerOrder, CustomerOrderDTOV1 $dto)"
        ));
        assert!(out.contains("public function deleteCustomerOrder(CustomerOrder $customerOrder)"));
        assert_eq!(out.matches("throw new CustomerOrderException(").count(), 6);
    }

    #[test]
    fn controller_members() {
        let out = render(TemplateId::Controller, &params()).unwrap();
        assert!(out.contains("namespace App\\Http\\Controllers\\Api\\V1;"));
        assert!(out.contains("class CustomerOrderControllerV1 extends ApiControllerV1"));
        for method in ["index(", "store(", "show(", "update(", "destroy("] {
            assert!(out.contains(&format!("public function {method}")), "missing {method}");
        }
        assert_eq!(out.matches("return $this->handleException($e);").count(), 5);
    }

    #[test]
    fn repository_members() {
        let base = render(TemplateId::BaseRepositoryInterface, &params()).unwrap();
        for method in ["all()", "find(", "findBy(", "create(", "update(", "delete("] {
            assert!(base.contains(&format!("public function {method}")), "missing {method}");
        }
        let repo = render(TemplateId::Repository, &params()).unwrap();
        assert!(repo.contains("class CustomerOrderRepositoryV1 extends BaseRepositoryV1"));
        assert!(repo.contains("const RELATIONS = [];"));
    }

    #[test]
    fn dto_members() {
        let out = render(TemplateId::Dto, &params()).unwrap();
        for method in [
            "static function rules()",
            "static function fromRequest(array $data)",
            "static function fromModel($model)",
            "static function validate(array $data)",
            "function toArray()",
            "function getExtra()",
        ] {
            assert!(out.contains(method), "missing {method}");
        }
    }

    #[test]
    fn exception_implements_versioned_interface() {
        let out = render(TemplateId::Exception, &params()).unwrap();
        assert!(out.contains("use App\\Interfaces\\V1\\ApiRenderableExceptionV1;"));
        assert!(out.contains("class CustomerOrderException extends Exception implements ApiRenderableExceptionV1"));
    }

    #[test]
    fn route_fragment() {
        let out = render(TemplateId::RouteFragment, &params()).unwrap();
        assert_eq!(
            out,
            "Route::apiResource('customer-orders', \\App\\Http\\Controllers\\Api\\V1\\CustomerOrderControllerV1::class);"
        );
    }
}

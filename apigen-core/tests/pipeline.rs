use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use apigen_core::{
    ArtifactKind, EmitResult, GenerateError, Generator, GeneratorConfig, NeverOverwrite,
    OverwriteMode,
};
use tempfile::TempDir;

fn config_in(dir: &Path) -> GeneratorConfig {
    GeneratorConfig {
        base_dir: dir.to_path_buf(),
        overwrite: OverwriteMode::Never,
        ..GeneratorConfig::default()
    }
}

fn snapshot(root: &Path) -> BTreeMap<PathBuf, Vec<u8>> {
    fn walk(dir: &Path, out: &mut BTreeMap<PathBuf, Vec<u8>>) {
        for entry in fs::read_dir(dir).unwrap() {
            let path = entry.unwrap().path();
            if path.is_dir() {
                walk(&path, out);
            } else {
                out.insert(path.clone(), fs::read(&path).unwrap());
            }
        }
    }
    let mut out = BTreeMap::new();
    walk(root, &mut out);
    out
}

fn read(root: &Path, relative: &str) -> String {
    fs::read_to_string(root.join(relative)).unwrap_or_else(|e| panic!("{relative}: {e}"))
}

#[test]
fn generates_full_stack_for_two_word_name() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let report = Generator::new(&config, &NeverOverwrite)
        .run("customer order", None, None)
        .unwrap();

    assert_eq!(report.identity.pascal_name(), "CustomerOrder");
    assert_eq!(report.identity.version(), "V1");
    assert_eq!(report.outcomes.len(), ArtifactKind::ALL.len());
    assert!(report.outcomes.iter().all(|o| o.result == EmitResult::Created));

    let root = tmp.path();
    assert!(read(root, "app/Models/CustomerOrder.php").contains("class CustomerOrder extends ModelBase"));
    assert!(read(root, "app/Models/CustomerOrder.php").contains("'customer_orders'"));
    assert!(read(root, "app/Repositories/V1/CustomerOrderRepositoryV1.php")
        .contains("class CustomerOrderRepositoryV1 extends BaseRepositoryV1"));
    assert!(read(root, "app/DTOs/V1/CustomerOrderDTOV1.php").contains("class CustomerOrderDTOV1"));
    assert!(read(root, "app/Services/Api/V1/CustomerOrderServiceV1.php")
        .contains("class CustomerOrderServiceV1"));
    assert!(read(root, "app/Exceptions/CustomerOrderException.php")
        .contains("implements ApiRenderableExceptionV1"));
    assert!(read(root, "app/Filters/CustomerOrderFilter.php").contains("extends QueryFilter"));
    assert!(read(root, "app/Http/Requests/Api/V1/CustomerOrder/StoreCustomerOrderRequestV1.php")
        .contains("class StoreCustomerOrderRequestV1"));
    assert!(read(root, "app/Http/Requests/Api/V1/CustomerOrder/UpdateCustomerOrderRequestV1.php")
        .contains("class UpdateCustomerOrderRequestV1"));
    assert!(read(root, "app/Http/Resources/Api/V1/CustomerOrder/CustomerOrderResourceV1.php")
        .contains("class CustomerOrderResourceV1"));
    assert!(read(root, "app/Http/Controllers/Api/V1/CustomerOrderControllerV1.php")
        .contains("class CustomerOrderControllerV1 extends ApiControllerV1"));

    let routes = read(root, "routes/api.php");
    assert!(routes.contains("Route::prefix('v1')->group(function () {"));
    assert!(routes.contains("Route::apiResource('customer-orders'"));

    let migrations: Vec<_> = fs::read_dir(root.join("database/migrations")).unwrap().collect();
    assert_eq!(migrations.len(), 1);

    // No raw placeholder survives rendering.
    for (path, bytes) in snapshot(root) {
        let text = String::from_utf8(bytes).unwrap();
        assert!(!text.contains("{{"), "{}", path.display());
    }
}

#[test]
fn second_run_changes_nothing() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let generator = Generator::new(&config, &NeverOverwrite);

    generator.run("customer order", None, None).unwrap();
    let before = snapshot(tmp.path());

    let report = generator.run("customer order", None, None).unwrap();
    assert_eq!(report.written(), 0);
    assert!(report.outcomes.iter().all(|o| o.result == EmitResult::Skipped));
    assert_eq!(snapshot(tmp.path()), before);
}

#[test]
fn route_registered_once_across_runs() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let generator = Generator::new(&config, &NeverOverwrite);

    generator.run("Order", None, None).unwrap();
    generator.run("order", Some("V1"), None).unwrap();

    let routes = read(tmp.path(), "routes/api.php");
    assert_eq!(routes.matches("Route::apiResource('orders'").count(), 1);
}

#[test]
fn second_resource_appends_to_existing_routes() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let generator = Generator::new(&config, &NeverOverwrite);

    generator.run("Order", None, None).unwrap();
    generator.run("Invoice", None, None).unwrap();

    let routes = read(tmp.path(), "routes/api.php");
    let orders = routes.find("'orders'").unwrap();
    let invoices = routes.find("'invoices'").unwrap();
    let close = routes.find("});").unwrap();
    assert!(orders < invoices && invoices < close);
}

#[test]
fn each_version_registers_in_its_own_group() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let generator = Generator::new(&config, &NeverOverwrite);

    generator.run("Order", None, None).unwrap();
    generator.run("Invoice", Some("V2"), None).unwrap();
    let report = generator.run("Order", Some("V2"), None).unwrap();

    let route = report
        .outcomes
        .iter()
        .find(|o| o.kind == ArtifactKind::RouteFragment)
        .unwrap();
    assert_eq!(route.result, EmitResult::Patched);

    let routes = read(tmp.path(), "routes/api.php");
    assert_eq!(routes.matches("Route::prefix(").count(), 2);
    let v2 = routes.find("Route::prefix('v2')").unwrap();
    let (v1_group, v2_group) = routes.split_at(v2);

    assert!(v1_group.contains("Route::prefix('v1')"));
    assert!(v1_group.contains("OrderControllerV1::class"));
    assert!(!v1_group.contains("V2::class"));

    assert!(v2_group.contains("Route::apiResource('invoices', \\App\\Http\\Controllers\\Api\\V2\\InvoiceControllerV2::class);"));
    assert!(v2_group.contains("Route::apiResource('orders', \\App\\Http\\Controllers\\Api\\V2\\OrderControllerV2::class);"));
    assert!(v2_group.trim_end().ends_with("});"));

    // Registering Order V2 again changes nothing.
    let before = read(tmp.path(), "routes/api.php");
    generator.run("Order", Some("V2"), None).unwrap();
    assert_eq!(read(tmp.path(), "routes/api.php"), before);
}

#[test]
fn empty_name_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let err = Generator::new(&config, &NeverOverwrite)
        .run("   ", None, None)
        .unwrap_err();

    assert!(matches!(err, GenerateError::InvalidInput(_)));
    assert!(snapshot(tmp.path()).is_empty());
}

#[test]
fn unknown_kind_writes_nothing() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let only = vec!["service".to_string(), "policy".to_string()];
    let err = Generator::new(&config, &NeverOverwrite)
        .run("Order", None, Some(only.as_slice()))
        .unwrap_err();

    assert!(matches!(err, GenerateError::UnsupportedKind(_)));
    assert!(snapshot(tmp.path()).is_empty());
}

#[test]
fn controller_without_class_fails_and_is_untouched() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("app/Http/Controllers/Api/V1/OrderControllerV1.php");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    let original = "<?php\n\nclass SomethingElse\n{\n}\n";
    fs::write(&path, original).unwrap();

    let config = config_in(tmp.path());
    let err = Generator::new(&config, &NeverOverwrite)
        .run("Order", None, None)
        .unwrap_err();

    assert!(matches!(err, GenerateError::AnchorNotFound { .. }));
    assert_eq!(fs::read_to_string(&path).unwrap(), original);
    // Fail-fast: the routes artifact after the controller was never reached.
    assert!(!tmp.path().join("routes/api.php").exists());
    // Artifacts before the failure stay.
    assert!(tmp.path().join("app/Services/Api/V1/OrderServiceV1.php").exists());
}

#[test]
fn framework_stub_controller_is_completed() {
    let tmp = TempDir::new().unwrap();
    let path = tmp.path().join("app/Http/Controllers/Api/V1/OrderControllerV1.php");
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        "<?php\n\nnamespace App\\Http\\Controllers\\Api\\V1;\n\nuse Illuminate\\Http\\Request;\n\nclass OrderControllerV1 extends Controller\n{\n    //\n}\n",
    )
    .unwrap();

    let config = config_in(tmp.path());
    let report = Generator::new(&config, &NeverOverwrite)
        .run("Order", None, None)
        .unwrap();

    let controller = report
        .outcomes
        .iter()
        .find(|o| o.kind == ArtifactKind::Controller)
        .unwrap();
    assert_eq!(controller.result, EmitResult::Patched);

    let content = fs::read_to_string(&path).unwrap();
    assert!(content.contains("use Illuminate\\Http\\Request;"));
    assert!(content.contains("class OrderControllerV1 extends ApiControllerV1"));
    assert!(content.contains("use App\\Services\\Api\\V1\\OrderServiceV1;"));
    for method in ["index", "store", "show", "update", "destroy"] {
        assert_eq!(
            content.matches(&format!("public function {method}(")).count(),
            1,
            "{method}"
        );
    }
    assert!(!content.contains("    //\n}"));
}

#[test]
fn edited_model_is_kept_when_overwrite_declined() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let generator = Generator::new(&config, &NeverOverwrite);
    generator.run("Order", None, None).unwrap();

    let model = tmp.path().join("app/Models/Order.php");
    fs::write(&model, "<?php // mine\n").unwrap();

    let report = generator.run("Order", None, None).unwrap();
    let outcome = report.outcomes.iter().find(|o| o.kind == ArtifactKind::Model).unwrap();
    assert_eq!(outcome.result, EmitResult::Skipped);
    assert_eq!(fs::read_to_string(&model).unwrap(), "<?php // mine\n");

    let forced = GeneratorConfig {
        overwrite: OverwriteMode::Always,
        ..config_in(tmp.path())
    };
    let report = Generator::new(&forced, &NeverOverwrite)
        .run("Order", None, None)
        .unwrap();
    let outcome = report.outcomes.iter().find(|o| o.kind == ArtifactKind::Model).unwrap();
    assert_eq!(outcome.result, EmitResult::Overwritten);
    assert!(fs::read_to_string(&model).unwrap().contains("extends ModelBase"));
}

#[test]
fn only_selected_kinds_are_written() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let only = vec!["routes".to_string(), "dto".to_string()];
    let report = Generator::new(&config, &NeverOverwrite)
        .run("Order", Some("V2"), Some(only.as_slice()))
        .unwrap();

    let kinds: Vec<_> = report.outcomes.iter().map(|o| o.kind).collect();
    assert_eq!(kinds, vec![ArtifactKind::Dto, ArtifactKind::RouteFragment]);
    assert!(tmp.path().join("app/DTOs/V2/OrderDTOV2.php").exists());
    assert!(read(tmp.path(), "routes/api.php").contains("Route::prefix('v2')"));
    assert!(!tmp.path().join("app/Models").exists());
}

#[test]
fn plan_is_a_dry_run() {
    let tmp = TempDir::new().unwrap();
    let config = config_in(tmp.path());
    let (identity, specs) = Generator::new(&config, &NeverOverwrite)
        .plan("customer order", Some("V3"), None)
        .unwrap();

    assert_eq!(identity.route_segment(), "customer-orders");
    assert_eq!(specs.len(), ArtifactKind::ALL.len());
    assert!(snapshot(tmp.path()).is_empty());
}

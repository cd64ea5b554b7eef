mod common;

use common::{MockConnector, Script};

use tienda_menu::catalog::Catalog;
use tienda_menu::cli::{Cell, OutputMode, ResultSet, NO_RESULTS};
use tienda_menu::executor::Executor;
use tienda_menu::error::MenuError;

#[tokio::test]
async fn zero_rows_prints_no_results_message_only() {
    let (conn, calls) = MockConnector::new(Script::Rows(ResultSet::new(["nombre"], vec![])));
    let exec = Executor::new(conn);
    let def = Catalog::reference().lookup(5).unwrap();

    let mut out: Vec<u8> = Vec::new();
    exec.run(def, &mut out).await.expect("run");
    let text = String::from_utf8(out).unwrap();

    assert!(text.contains("Tipo: - Diferencia"));
    assert!(text.contains("Descripción: Clientes que no han realizado pedidos"));
    assert_eq!(text.trim_end().lines().last(), Some(NO_RESULTS));
    assert!(!text.contains('+'), "no grid expected:\n{}", text);
    assert!(!text.contains("nombre"));
    assert_eq!(calls.opened(), 1);
    assert_eq!(calls.closed(), 1);
}

#[tokio::test]
async fn projection_renders_header_and_row() {
    let rs = ResultSet::new(["nombre", "correo"], vec![vec![Cell::from("CDMX"), Cell::from("a@x.com")]]);
    let (conn, calls) = MockConnector::new(Script::Rows(rs));
    let exec = Executor::new(conn);
    let def = Catalog::reference().lookup(2).unwrap();

    let mut out: Vec<u8> = Vec::new();
    exec.run(def, &mut out).await.expect("run");
    let text = String::from_utf8(out).unwrap();

    let grid_rows: Vec<&str> = text.lines().filter(|l| l.starts_with('|')).collect();
    assert_eq!(grid_rows.len(), 2, "{}", text);
    assert!(grid_rows[0].contains("nombre") && grid_rows[0].contains("correo"));
    assert!(grid_rows[1].contains("CDMX") && grid_rows[1].contains("a@x.com"));
    assert_eq!(calls.queries(), vec![def.query_text.to_string()]);
}

#[tokio::test]
async fn query_failure_still_closes_session() {
    let (conn, calls) = MockConnector::new(Script::QueryFails(
        "You have an error in your SQL syntax near 'AND NOT EXISTS'".into(),
    ));
    let exec = Executor::new(conn);
    let def = Catalog::reference().lookup(18).unwrap();

    let mut out: Vec<u8> = Vec::new();
    let err = exec.run(def, &mut out).await.unwrap_err();
    match &err {
        MenuError::Query { key, .. } => assert_eq!(*key, 18),
        other => panic!("expected query failure, got {:?}", other),
    }
    assert_eq!(err.code(), "query_failure");
    assert!(out.is_empty());
    assert_eq!(calls.opened(), 1);
    assert_eq!(calls.closed(), 1);
}

#[tokio::test]
async fn connection_failure_is_typed() {
    let (conn, calls) = MockConnector::new(Script::ConnectFails("Access denied for user 'root'".into()));
    let exec = Executor::new(conn);
    let def = Catalog::reference().lookup(1).unwrap();

    let err = exec.fetch(def).await.unwrap_err();
    assert_eq!(err.code(), "connection_failure");
    assert!(err.to_string().contains("mock:3306/tienda_online"));
    assert_eq!(calls.opened(), 0);
    assert_eq!(calls.closed(), 0);
}

#[tokio::test]
async fn each_run_opens_its_own_session() {
    let (conn, calls) = MockConnector::new(Script::Rows(ResultSet::new(["n"], vec![vec![Cell::Int(1)]])));
    let exec = Executor::new(conn);
    let cat = Catalog::reference();
    for key in [1, 9, 20] {
        exec.fetch(cat.lookup(key).unwrap()).await.unwrap();
    }
    assert_eq!(calls.opened(), 3);
    assert_eq!(calls.closed(), 3);
}

#[tokio::test]
async fn json_mode_prints_result_document() {
    let rs = ResultSet::new(["nombre", "promedio"], vec![vec![Cell::from("Libros"), Cell::Decimal("249.5000".into())]]);
    let (conn, _calls) = MockConnector::new(Script::Rows(rs));
    let exec = Executor::new(conn).with_mode(OutputMode::Json);
    let def = Catalog::reference().lookup(13).unwrap();

    let mut out: Vec<u8> = Vec::new();
    exec.run(def, &mut out).await.unwrap();
    let text = String::from_utf8(out).unwrap();
    let body = &text[text.find('{').expect("json body")..];
    let v: serde_json::Value = serde_json::from_str(body.trim()).unwrap();
    assert_eq!(v["rows"][0][1], "249.5000");
}

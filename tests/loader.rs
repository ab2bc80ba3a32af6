use orgchart::NO_LINE;
use orgchart::hierarchy::build_tree;
use orgchart::loader::{LoadError, roster_from_csv, roster_from_file};
use std::io::Write;

const PUBLISHED: &str = "\
codigo,nombre,cargo,linea,codigoJefe,salario
E1,Ana Pérez,JEFE DE OPERACIONES,WAREHOUSE,,\"$ 4.500.000,00\"
E2,Luis Gómez,LIDER,WAREHOUSE,E1,\"$ 2.100.000\"

E3,Sara Ruiz,AUXILIAR,,E2,abc
E4,Juan Díaz,SUPERVISOR,LAST MILE,E9,\"1.800.000,50\"
";

#[test]
fn parses_published_roster() {
    let roster = roster_from_csv(PUBLISHED).unwrap();
    assert_eq!(roster.len(), 4);

    let e1 = roster.index()["E1"];
    assert_eq!(e1.name, "Ana Pérez");
    assert_eq!(e1.title, "JEFE DE OPERACIONES");
    assert_eq!(e1.line, "WAREHOUSE");
    assert_eq!(e1.manager_id, "");
    assert_eq!(e1.salary, 4500000.0);

    let e3 = roster.index()["E3"];
    assert_eq!(e3.line, NO_LINE);
    assert_eq!(e3.salary, 0.0);

    assert_eq!(roster.index()["E4"].salary, 1800000.5);
}

#[test]
fn malformed_salary_counts_but_adds_nothing() {
    let csv = "codigo,nombre,cargo,linea,codigoJefe,salario\n\
               E1,Ana,JEFE,A,,100\n\
               E2,Luis,AUX,A,E1,abc\n";
    let roster = roster_from_csv(csv).unwrap();
    let root = build_tree(&roster).unwrap();

    let line = root.find("A").unwrap();
    assert_eq!(line.direct_count, 2);
    assert_eq!(line.total_salary, 100.0);
    assert_eq!(root.direct_count, 2);
}

#[test]
fn english_headers_in_any_order() {
    let csv = "salary, manager_id ,line,title,name,id\n\"1.000\",,A,JEFE,Ana,E1\n";
    let roster = roster_from_csv(csv).unwrap();

    let e1 = roster.index()["E1"];
    assert_eq!(e1.name, "Ana");
    assert_eq!(e1.title, "JEFE");
    assert_eq!(e1.salary, 1000.0);
}

#[test]
fn short_rows_fill_missing_cells() {
    let csv = "codigo,nombre,cargo,linea,codigoJefe,salario\r\nE1,Ana\r\n";
    let roster = roster_from_csv(csv).unwrap();

    let e1 = roster.index()["E1"];
    assert_eq!(e1.title, "");
    assert_eq!(e1.line, NO_LINE);
    assert_eq!(e1.manager_id, "");
    assert_eq!(e1.salary, 0.0);
}

#[test]
fn header_only_is_an_empty_roster() {
    let roster = roster_from_csv("codigo,nombre,cargo,linea,codigoJefe,salario\n").unwrap();
    assert!(roster.is_empty());
    assert!(build_tree(&roster).is_none());
}

#[test]
fn blank_input_is_rejected() {
    assert!(matches!(roster_from_csv("\n  \n"), Err(LoadError::Empty)));
}

#[test]
fn reads_roster_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PUBLISHED.as_bytes()).unwrap();

    let roster = roster_from_file(file.path()).unwrap();
    assert_eq!(roster.len(), 4);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = roster_from_file(dir.path().join("missing.csv"));
    assert!(matches!(result, Err(LoadError::Io(_))));
}

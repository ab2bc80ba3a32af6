use crate::employee::{Employee, Roster};
use crate::salary::parse_salary;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while turning published CSV into a roster.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("roster CSV has no header line")]
    Empty,

    #[error("failed to read roster file: {0}")]
    Io(#[from] std::io::Error),
}

// Accepted header names per field, compared case-insensitively
const ID_HEADERS: &[&str] = &["codigo", "id"];
const NAME_HEADERS: &[&str] = &["nombre", "name"];
const TITLE_HEADERS: &[&str] = &["cargo", "title"];
const LINE_HEADERS: &[&str] = &["linea", "line"];
const MANAGER_HEADERS: &[&str] = &["codigojefe", "managerid", "manager_id"];
const SALARY_HEADERS: &[&str] = &["salario", "salary"];

/// Column positions resolved from the header line.
struct Columns {
    id: Option<usize>,
    name: Option<usize>,
    title: Option<usize>,
    line: Option<usize>,
    manager: Option<usize>,
    salary: Option<usize>,
}

impl Columns {
    fn resolve(headers: &[String]) -> Self {
        let find = |names: &[&str]| {
            headers
                .iter()
                .position(|h| names.iter().any(|n| h.eq_ignore_ascii_case(n)))
        };

        Columns {
            id: find(ID_HEADERS),
            name: find(NAME_HEADERS),
            title: find(TITLE_HEADERS),
            line: find(LINE_HEADERS),
            manager: find(MANAGER_HEADERS),
            salary: find(SALARY_HEADERS),
        }
    }
}

/// Build a roster from the CSV text published by the spreadsheet.
///
/// Blank lines are ignored and the first remaining line names the columns.
/// Every value is trimmed; missing cells read as empty strings, so a row
/// without a line falls into the "no line" bucket and a row without a
/// manager code has no manager. Salaries go through [`parse_salary`].
///
/// # Errors
/// * [`LoadError::Empty`] when the text has no header line at all
///
/// # Examples
/// ```
/// use orgchart::loader::roster_from_csv;
///
/// let csv = "codigo,nombre,cargo,linea,codigoJefe,salario\nE1,Ana,JEFE,WAREHOUSE,,\"1.000,50\"\n";
/// let roster = roster_from_csv(csv).unwrap();
/// assert_eq!(roster.len(), 1);
/// assert_eq!(roster.employees()[0].salary, 1000.5);
/// ```
pub fn roster_from_csv(text: &str) -> Result<Roster, LoadError> {
    let mut lines = text.lines().filter(|line| !line.trim().is_empty());

    let header_line = lines.next().ok_or(LoadError::Empty)?;
    let headers: Vec<String> = parse_csv_row(header_line)
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();
    let columns = Columns::resolve(&headers);

    let employees = lines
        .map(|line| {
            let values = parse_csv_row(line);
            let cell = |col: Option<usize>| {
                col.and_then(|c| values.get(c))
                    .map(|v| v.trim())
                    .unwrap_or("")
            };

            Employee::new(
                cell(columns.id),
                cell(columns.name),
                cell(columns.title),
                cell(columns.line),
                cell(columns.manager),
                parse_salary(cell(columns.salary)),
            )
        })
        .collect::<Vec<_>>();

    log::debug!("parsed {} roster rows", employees.len());
    Ok(Roster::new(employees))
}

/// Load a roster from a CSV file on disk.
pub fn roster_from_file(path: impl AsRef<Path>) -> Result<Roster, LoadError> {
    let text = fs::read_to_string(path)?;
    roster_from_csv(&text)
}

/// Split one CSV line into its fields.
///
/// Commas inside double quotes do not separate fields and `""` inside a
/// quoted field stands for a literal quote.
pub fn parse_csv_row(line: &str) -> Vec<String> {
    let mut result = Vec::new();
    let mut current_field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' => {
                if in_quotes && chars.peek() == Some(&'"') {
                    current_field.push('"');
                    chars.next();
                } else {
                    in_quotes = !in_quotes;
                }
            }
            ',' if !in_quotes => {
                result.push(std::mem::take(&mut current_field));
            }
            _ => current_field.push(c),
        }
    }

    result.push(current_field);
    result
}

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Line value the upstream sheet uses when an employee has no business line.
pub const NO_LINE: &str = "Sin línea";

/// One roster row after coercion.
///
/// Text fields are trimmed, a blank line becomes [`NO_LINE`] and the salary
/// is always a finite, non-negative number.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    /// Employee code, assumed unique within the roster
    pub id: String,

    /// Display name
    pub name: String,

    /// Role or position label
    pub title: String,

    /// Business line the employee belongs to
    pub line: String,

    /// Code of the employee's manager, empty when there is none
    pub manager_id: String,

    /// Monthly salary
    pub salary: f64,
}

impl Employee {
    pub fn new(
        id: &str,
        name: &str,
        title: &str,
        line: &str,
        manager_id: &str,
        salary: f64,
    ) -> Self {
        let line = line.trim();
        Employee {
            id: id.trim().to_string(),
            name: name.trim().to_string(),
            title: title.trim().to_string(),
            line: if line.is_empty() {
                NO_LINE.to_string()
            } else {
                line.to_string()
            },
            manager_id: manager_id.trim().to_string(),
            salary: if salary.is_finite() && salary > 0.0 {
                salary
            } else {
                0.0
            },
        }
    }

    /// True when the employee is assigned to a real business line.
    pub fn has_line(&self) -> bool {
        !self.line.is_empty() && self.line != NO_LINE
    }

    pub fn has_manager(&self) -> bool {
        !self.manager_id.is_empty()
    }
}

/// A full snapshot of the employee roster, in source order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    employees: Vec<Employee>,
}

impl Roster {
    pub fn new(employees: Vec<Employee>) -> Self {
        Roster { employees }
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Employee> {
        self.employees.iter()
    }

    pub fn employees(&self) -> &[Employee] {
        &self.employees
    }

    /// Distinct real lines in first-seen order. The [`NO_LINE`] sentinel is skipped.
    pub fn lines(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.employees
            .iter()
            .filter(|e| e.has_line())
            .map(|e| e.line.as_str())
            .filter(|line| seen.insert(*line))
            .collect()
    }

    /// Employees keyed by code. With duplicated codes the last row wins.
    pub fn index(&self) -> HashMap<&str, &Employee> {
        self.employees.iter().map(|e| (e.id.as_str(), e)).collect()
    }
}

impl From<Vec<Employee>> for Roster {
    fn from(employees: Vec<Employee>) -> Self {
        Roster::new(employees)
    }
}

impl<'a> IntoIterator for &'a Roster {
    type Item = &'a Employee;
    type IntoIter = std::slice::Iter<'a, Employee>;

    fn into_iter(self) -> Self::IntoIter {
        self.employees.iter()
    }
}

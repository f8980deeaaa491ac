use std::io;
use std::rc::Rc;

use termcolor::WriteColor;
use tracing::info;

use crate::diagnostics::FailureKind;
use crate::harness::case::{Case, CaseKey, CaseSpec};
use crate::harness::report::{self, SuiteReport};
use crate::harness::{HarnessConfig, Status};
use crate::runtime::SharedScope;

/// A named group of cases evaluated in insertion order against one scope.
#[derive(Debug)]
pub struct Suite {
    name: String,
    cases: Vec<Case>,
    status: Status,
    scope: SharedScope,
    config: Rc<HarnessConfig>,
}

impl Suite {
    pub fn new(name: impl Into<String>, scope: SharedScope) -> Self {
        Self::with_config(name, scope, Rc::new(HarnessConfig::default()))
    }

    pub fn with_config(
        name: impl Into<String>,
        scope: SharedScope,
        config: Rc<HarnessConfig>,
    ) -> Self {
        Self {
            name: name.into(),
            cases: Vec::new(),
            status: Status::Pending,
            scope,
            config,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn passed(&self) -> bool {
        self.status.is_passed()
    }

    pub fn cases(&self) -> &[Case] {
        &self.cases
    }

    pub fn case(&self, key: CaseKey<'_>) -> Option<&Case> {
        self.cases.iter().find(|case| case.key() == key)
    }

    pub fn len(&self) -> usize {
        self.cases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cases.is_empty()
    }

    pub fn scope(&self) -> &SharedScope {
        &self.scope
    }

    pub(crate) fn attach_scope(&mut self, scope: SharedScope) {
        for case in &mut self.cases {
            case.attach_scope(Rc::clone(&scope));
        }
        self.scope = scope;
    }

    // ------------------------------------------------------------------------
    // get-or-create
    // ------------------------------------------------------------------------

    /// Returns the plain case for `expr`, creating it on first request.
    ///
    /// An existing case keeps its original description.
    pub fn get_or_create_case(&mut self, expr: &str, description: Option<&str>) -> &mut Case {
        self.get_or_insert(
            CaseSpec::Plain {
                expr: expr.to_string(),
            },
            description,
        )
    }

    /// Returns the sequence case for exactly these lines, creating it on first request.
    pub fn get_or_create_sequence_case<I, S>(
        &mut self,
        lines: I,
        description: Option<&str>,
    ) -> &mut Case
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let lines = lines.into_iter().map(Into::into).collect();
        self.get_or_insert(CaseSpec::Sequence { lines }, description)
    }

    /// Returns the expected-error case for `expr`, creating it on first request.
    ///
    /// Identity is the expression alone; a later request with another kind or
    /// message returns the existing case unchanged.
    pub fn get_or_create_error_case(
        &mut self,
        expr: &str,
        kind: FailureKind,
        message: Option<&str>,
    ) -> &mut Case {
        self.get_or_insert(
            CaseSpec::ExpectError {
                expr: expr.to_string(),
                kind,
                message: message.map(str::to_string),
            },
            None,
        )
    }

    fn get_or_insert(&mut self, spec: CaseSpec, description: Option<&str>) -> &mut Case {
        let index = match self.cases.iter().position(|case| case.key() == spec.key()) {
            Some(index) => index,
            None => {
                let case = Case::with_config(
                    spec,
                    description,
                    Rc::clone(&self.scope),
                    Rc::clone(&self.config),
                );
                self.cases.push(case);
                self.cases.len() - 1
            }
        };
        &mut self.cases[index]
    }

    // ------------------------------------------------------------------------
    // evaluation and reporting
    // ------------------------------------------------------------------------

    /// Evaluates every case in order, without stopping at the first failure.
    pub fn evaluate(&mut self) -> bool {
        let mut all_passed = true;
        for case in &mut self.cases {
            all_passed &= case.evaluate();
        }
        self.status = Status::from_passed(all_passed);
        info!(
            suite = %self.name,
            cases = self.cases.len(),
            passed = all_passed,
            "suite evaluated"
        );
        all_passed
    }

    /// Writes the suite header followed by one indented line per case.
    pub fn write_report(&self, out: &mut dyn WriteColor) -> io::Result<()> {
        let style = &self.config.style;
        report::write_status_line(out, style, self.status, "", &self.name)?;
        writeln!(out)?;
        for case in &self.cases {
            case.write_report(out, style, &style.indent)?;
        }
        Ok(())
    }

    pub fn print_report(&self) -> io::Result<()> {
        let mut stdout = report::stdout_stream(self.config.color);
        self.write_report(&mut stdout)
    }

    /// Evaluates, then prints the suite report.
    pub fn run(&mut self) -> io::Result<bool> {
        let passed = self.evaluate();
        self.print_report()?;
        Ok(passed)
    }

    pub fn report(&self) -> SuiteReport {
        SuiteReport {
            name: self.name.clone(),
            status: self.status,
            cases: self.cases.iter().map(Case::report).collect(),
        }
    }
}

//! Console report in the shape of `go test` output.

use std::io::{self, Write};

use crate::harness::ModuleTest;

pub struct Reporter<W: Write> {
    out: W,
    /// Print module output for passing modules too.
    verbose: bool,
}

impl<W: Write> Reporter<W> {
    pub fn new(out: W, verbose: bool) -> Self {
        Self { out, verbose }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    pub fn discovered(&mut self, modules: &[ModuleTest]) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "Found the following directories to test:")?;
        for module in modules {
            writeln!(self.out, "\t- {}", module.name)?;
        }
        writeln!(self.out)?;
        writeln!(self.out, "Running tests...")?;
        writeln!(self.out)?;
        self.out.flush()
    }

    pub fn module_started(&mut self, module: &ModuleTest) -> io::Result<()> {
        writeln!(self.out, "=== RUN   {}", module.name)?;
        self.out.flush()
    }

    pub fn module_finished(&mut self, module: &ModuleTest) -> io::Result<()> {
        if module.failed() || self.verbose {
            for line in module.output().lines() {
                writeln!(self.out, "\t{}", line)?;
            }
        }

        if module.failed() {
            writeln!(self.out, "--- FAIL: {}", module.name)?;
        } else {
            writeln!(self.out, "--- PASS: {}", module.name)?;
        }
        self.out.flush()
    }

    pub fn summary(&mut self, failed: bool) -> io::Result<()> {
        writeln!(self.out, "{}", if failed { "FAIL" } else { "PASS" })?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(reporter: Reporter<Vec<u8>>) -> String {
        String::from_utf8(reporter.into_inner()).unwrap()
    }

    #[test]
    fn test_discovered_header() {
        let modules = vec![
            ModuleTest::new("a", "/work/a"),
            ModuleTest::new("nested/b", "/work/nested/b"),
        ];
        let mut reporter = Reporter::new(Vec::new(), false);
        reporter.discovered(&modules).unwrap();

        assert_eq!(
            rendered(reporter),
            "\nFound the following directories to test:\n\t- a\n\t- nested/b\n\nRunning tests...\n\n"
        );
    }

    #[test]
    fn test_pass_marker_hides_output() {
        let module = ModuleTest::new("a", "/work/a");
        let mut reporter = Reporter::new(Vec::new(), false);
        reporter.module_started(&module).unwrap();
        reporter.module_finished(&module).unwrap();
        reporter.summary(false).unwrap();

        assert_eq!(rendered(reporter), "=== RUN   a\n--- PASS: a\nPASS\n");
    }

    #[test]
    fn test_summary_fail() {
        let mut reporter = Reporter::new(Vec::new(), false);
        reporter.summary(true).unwrap();
        assert_eq!(rendered(reporter), "FAIL\n");
    }
}

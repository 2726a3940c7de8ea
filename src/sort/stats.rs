use colored::Colorize;

/// Counters for one sorting run.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct SortStats {
    pub(crate) moved: usize,
    pub(crate) created: usize,
    pub(crate) renamed: usize,
    pub(crate) skipped: usize,
    pub(crate) failed: usize,
}

impl SortStats {
    #[must_use]
    pub const fn moved(&self) -> usize {
        self.moved
    }

    #[must_use]
    pub const fn created(&self) -> usize {
        self.created
    }

    #[must_use]
    pub const fn renamed(&self) -> usize {
        self.renamed
    }

    #[must_use]
    pub const fn skipped(&self) -> usize {
        self.skipped
    }

    #[must_use]
    pub const fn failed(&self) -> usize {
        self.failed
    }

    pub(crate) const fn inc_moved(&mut self) {
        self.moved += 1;
    }

    pub(crate) const fn inc_created(&mut self) {
        self.created += 1;
    }

    pub(crate) const fn inc_renamed(&mut self) {
        self.renamed += 1;
    }

    pub(crate) const fn inc_skipped(&mut self) {
        self.skipped += 1;
    }

    pub(crate) const fn inc_failed(&mut self) {
        self.failed += 1;
    }

    /// True if the run did not move, create or rename anything.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        self.moved == 0 && self.created == 0 && self.renamed == 0
    }

    pub fn print_summary(&self) {
        println!("{}", "Summary:".bold());
        println!("  {}    {}", "Moved:".green(), self.moved);
        if self.created > 0 {
            println!("  {}  {}", "Created:".cyan(), self.created);
        }
        if self.renamed > 0 {
            println!("  {}  {}", "Renamed:".cyan(), self.renamed);
        }
        if self.skipped > 0 {
            println!("  {}  {}", "Skipped:".yellow(), self.skipped);
        }
        if self.failed > 0 {
            println!("  {}   {}", "Failed:".red(), self.failed);
        }
    }
}

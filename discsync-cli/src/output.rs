use colored::Colorize;
use core_reconcile::SyncReport;

pub fn print_error(msg: &str) {
    eprintln!("{} {}", "✗".red(), msg);
}

pub fn print_summary(user: &str, report: &SyncReport) {
    println!(
        "{} Synced collection for {}",
        "✓".green(),
        user.cyan().bold()
    );
    println!(
        "  {} items upstream, {} seen across {} pages",
        report.total_upstream, report.items_seen, report.pages_fetched
    );
    println!("  {} added, {} deleted", report.items_added, report.items_deleted);

    if !report.had_cleanup() {
        println!("  No records to cleanup. The index is up to date.");
    }
}

use mindbank_core::storage::Database;

pub fn run(yes: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !yes {
        return Err("reset erases all journal data and settings; pass --yes to confirm".into());
    }

    let db = Database::open()?;
    let summary = db.reset_all()?;
    println!(
        "erased {} deposits, {} reframes, {} routine checks, {} daily flags, {} projects",
        summary.deleted_deposits,
        summary.deleted_reframes,
        summary.deleted_routine_checks,
        summary.deleted_flags,
        summary.deleted_projects,
    );
    Ok(())
}

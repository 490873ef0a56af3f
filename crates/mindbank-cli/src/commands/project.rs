use clap::Subcommand;
use mindbank_core::storage::Database;
use mindbank_core::Project;

#[derive(Subcommand)]
pub enum ProjectAction {
    /// Create a new project worksheet
    Create { title: String },
    /// List all projects, newest first
    List,
    /// Show one project by id
    Show { id: String },
}

pub fn run(action: ProjectAction) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::open()?;

    match action {
        ProjectAction::Create { title } => {
            let project = Project::new(&title);
            db.create_project(&project)?;
            println!("{}", serde_json::to_string_pretty(&project)?);
        }
        ProjectAction::List => {
            let projects = db.list_projects()?;
            println!("{}", serde_json::to_string_pretty(&projects)?);
        }
        ProjectAction::Show { id } => match db.get_project(&id)? {
            Some(project) => println!("{}", serde_json::to_string_pretty(&project)?),
            None => return Err(format!("no project with id {id}").into()),
        },
    }
    Ok(())
}

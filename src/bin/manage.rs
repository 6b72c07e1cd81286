// manage - administrative commands for a yatube database
// Groups and flat pages have no web UI, they are created from here.

use std::env;
use yatube::{
    config::Config,
    data_seeder::seed_demo_data,
    entities::{ent_user::NewUser, FlatPage, Group, User},
    infrastructure::Database,
};

fn usage() {
    eprintln!("Usage: manage <command> [args]");
    eprintln!("Commands:");
    eprintln!("  init                                  - Create tables and default flat pages");
    eprintln!("  create-user <username> <password>     - Register an account");
    eprintln!("  create-group <title> [slug] [description] - Add a post group");
    eprintln!("  set-flatpage <url> <title> <content>  - Create or replace a flat page");
    eprintln!("  seed-demo                             - Fill the database with demo content");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "yatube=info".into()),
        )
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let Some(command) = args.first() else {
        usage();
        return Ok(());
    };

    let config = Config::from_env()?;
    let db = Database::connect(&config.database.url).await?;
    db.init().await?;

    match (command.as_str(), &args[1..]) {
        ("init", []) => {
            let seeded = FlatPage::seed_defaults(&db).await?;
            println!("Database ready at {} ({} flat pages added)", config.database.url, seeded);
        }
        ("create-user", [username, password]) => {
            let user = User::create(
                &db,
                NewUser {
                    username: username.as_str(),
                    password: password.as_str(),
                    ..Default::default()
                },
            )
            .await?;
            println!("Created user {} (id {})", user.username, user.id);
        }
        ("create-group", [title, rest @ ..]) if rest.len() <= 2 => {
            let slug = rest.first().cloned().unwrap_or_else(|| Group::slugify(title));
            let description = rest.get(1).map(String::as_str).unwrap_or_default();
            let group = Group::create(&db, title, &slug, description).await?;
            println!("Created group {} at /group/{}/", group.title, group.slug);
        }
        ("set-flatpage", [url, title, content]) => {
            FlatPage::upsert(&db, url, title, content).await?;
            println!("Saved flat page {}", FlatPage::normalize_url(url));
        }
        ("seed-demo", []) => {
            let summary = seed_demo_data(&db).await?;
            println!("{:?}", summary);
        }
        _ => {
            eprintln!("Unknown command or wrong arguments: {}", args.join(" "));
            usage();
        }
    }

    db.close().await;
    Ok(())
}

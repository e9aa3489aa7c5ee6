use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use lectern::Config;
use lectern::api::ApiClient;
use lectern::auth::{FileCredentialStore, Session};
use lectern::error::{AppError, AppResult, run_with_error_handler};
use lectern::learn::{Applied, LearningSession};
use lectern::model::entity::{CourseForm, Lecture, LectureForm, ModuleUpdate};
use lectern::model::{Attachment, LectureFilter, PaginationParams};
use lectern::progress::{DashboardStats, ProgressOverview};
use lectern::utils::{format_price, initials, truncate_text};

#[derive(Parser, Debug)]
#[command(name = "lectern", about = "Learn and manage courses on the LMS", long_about = None)]
pub struct Cli {
    /// Read ./config.toml instead of the user config directory
    #[arg(long, global = true)]
    pub local: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and out
    Auth {
        #[command(subcommand)]
        action: AuthCommands,
    },

    /// Manage courses
    Course {
        #[command(subcommand)]
        action: CourseCommands,
    },

    /// Manage modules
    Module {
        #[command(subcommand)]
        action: ModuleCommands,
    },

    /// Manage lectures
    Lecture {
        #[command(subcommand)]
        action: LectureCommands,
    },

    /// Work through a course
    Learn {
        #[command(subcommand)]
        action: LearnCommands,
    },

    /// Show learning progress
    Progress {
        #[command(subcommand)]
        action: ProgressCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum AuthCommands {
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
    },
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        confirm: String,
    },
    Logout,
    Whoami,
}

#[derive(Subcommand, Debug)]
pub enum CourseCommands {
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
        #[arg(long, default_value_t = 10)]
        limit: u32,
        #[arg(long)]
        search: Option<String>,
        /// Use the public catalogue instead of the admin listing
        #[arg(long, default_value_t = false)]
        published: bool,
    },
    Show {
        id: String,
    },
    Create {
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        price: String,
        /// Path to the thumbnail image
        #[arg(long)]
        thumbnail: PathBuf,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        price: Option<String>,
        #[arg(long)]
        thumbnail: Option<PathBuf>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ModuleCommands {
    List {
        course_id: String,
    },
    Create {
        #[arg(long)]
        course_id: String,
        #[arg(long)]
        title: String,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        /// Move the module to another course
        #[arg(long)]
        course_id: Option<String>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum LectureCommands {
    List {
        #[arg(long)]
        course_id: Option<String>,
        #[arg(long)]
        module_id: Option<String>,
    },
    Show {
        id: String,
    },
    Create {
        #[arg(long)]
        module_id: String,
        #[arg(long)]
        course_id: Option<String>,
        #[arg(long)]
        title: String,
        #[arg(long)]
        video_url: String,
        /// PDF notes to attach; may be repeated
        #[arg(long = "note")]
        notes: Vec<PathBuf>,
    },
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        video_url: Option<String>,
        #[arg(long = "note")]
        notes: Vec<PathBuf>,
    },
    Delete {
        id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum LearnCommands {
    /// Lectures grouped by module, with lock and completion marks
    Outline { course: String },
    Search { course: String, query: String },
    Select { course: String, lecture: String },
    /// Mark the current lecture complete
    Complete { course: String },
    Next { course: String },
    Prev { course: String },
}

#[derive(Subcommand, Debug)]
pub enum ProgressCommands {
    Dashboard,
    List,
}

#[tokio::main]
async fn main() {
    lectern::setup_trace();
    let cli = Cli::parse();

    run_with_error_handler(async || run(&cli).await).await;
}

async fn run(cli: &Cli) -> AppResult<()> {
    let config = Config::get_or_init(cli.local).await;

    let store = FileCredentialStore::new(config.session().credentials_path());
    let session = Arc::new(Session::new(
        store,
        config.api().jwt_secret().map(str::to_string),
    ));
    session.restore()?;
    let client = ApiClient::from_config(config, Arc::clone(&session))?;

    match &cli.command {
        Commands::Auth { action } => auth(&client, action).await,
        Commands::Course { action } => course(&client, action).await,
        Commands::Module { action } => module(&client, action).await,
        Commands::Lecture { action } => lecture(&client, action).await,
        Commands::Learn { action } => learn(client, action).await,
        Commands::Progress { action } => progress(&client, action).await,
    }
}

fn require_admin(client: &ApiClient) -> AppResult<()> {
    if client.session().is_admin() {
        Ok(())
    } else {
        Err(AppError::AdminRequired)
    }
}

async fn auth(client: &ApiClient, action: &AuthCommands) -> AppResult<()> {
    match action {
        AuthCommands::Login { email, password } => {
            let user = client.login(email, password).await?;
            println!("Signed in as {} ({})", user.name(), user.role());
        }
        AuthCommands::Register {
            name,
            email,
            password,
            confirm,
        } => {
            let user = client.register(name, email, password, confirm).await?;
            println!("Welcome, {}!", user.name());
        }
        AuthCommands::Logout => {
            client.logout().await;
            println!("Signed out");
        }
        AuthCommands::Whoami => match client.session().user() {
            Some(user) => println!(
                "[{}] {} <{}> ({})",
                initials(user.name()),
                user.name(),
                user.email(),
                user.role()
            ),
            None => println!("Not signed in"),
        },
    }
    Ok(())
}

async fn course(client: &ApiClient, action: &CourseCommands) -> AppResult<()> {
    match action {
        CourseCommands::List {
            page,
            limit,
            search,
            published,
        } => {
            let mut params = PaginationParams::default().with_page(*page).with_limit(*limit);
            if let Some(term) = search {
                params = params.with_search(term.as_str());
            }

            let courses = if *published {
                client.list_published_courses(&params).await?
            } else {
                require_admin(client)?;
                client.list_courses(&params).await?
            };
            for c in &courses.items {
                println!(
                    "{}  {}  {}  {}",
                    c.id,
                    c.title,
                    format_price(&c.price),
                    truncate_text(&c.description, 60)
                );
            }
            println!("{} of {} course(s)", courses.items.len(), courses.total());
        }
        CourseCommands::Show { id } => {
            let c = client.get_course_for_user(id).await?;
            println!("{} [{}]", c.title, c.id);
            println!("price: {}", format_price(&c.price));
            if let Some(url) = c.thumbnail_url() {
                println!("thumbnail: {url}");
            }
            println!("{}", c.description);
        }
        CourseCommands::Create {
            title,
            description,
            price,
            thumbnail,
        } => {
            require_admin(client)?;
            let form = CourseForm {
                title: title.clone(),
                description: description.clone(),
                price: price.clone(),
                thumbnail: Some(Attachment::from_path(thumbnail)?),
            };
            let c = client.create_course(&form).await?;
            println!("Course created: {} [{}]", c.title, c.id);
        }
        CourseCommands::Update {
            id,
            title,
            description,
            price,
            thumbnail,
        } => {
            require_admin(client)?;
            let existing = client.get_course(id).await?;
            let form = CourseForm {
                title: title.clone().unwrap_or(existing.title),
                description: description.clone().unwrap_or(existing.description),
                price: price.clone().unwrap_or(existing.price),
                thumbnail: thumbnail.as_ref().map(Attachment::from_path).transpose()?,
            };
            let c = client.update_course(id, &form).await?;
            println!("Course updated: {} [{}]", c.title, c.id);
        }
        CourseCommands::Delete { id } => {
            require_admin(client)?;
            println!("{}", client.delete_course(id).await?);
        }
    }
    Ok(())
}

async fn module(client: &ApiClient, action: &ModuleCommands) -> AppResult<()> {
    require_admin(client)?;
    match action {
        ModuleCommands::List { course_id } => {
            let modules = client
                .list_modules(course_id, &PaginationParams::default())
                .await?;
            for m in &modules.items {
                println!("Module {}: {} [{}]", m.module_number, m.title, m.id);
            }
        }
        ModuleCommands::Create { course_id, title } => {
            let m = client.create_module(title, course_id).await?;
            println!("Module created: {} (number {})", m.title, m.module_number);
        }
        ModuleCommands::Update {
            id,
            title,
            course_id,
        } => {
            let patch = ModuleUpdate {
                title: title.clone(),
                course_id: course_id.clone(),
            };
            let m = client.update_module(id, &patch).await?;
            println!("Module updated: {} [{}]", m.title, m.id);
        }
        ModuleCommands::Delete { id } => {
            println!("{}", client.delete_module(id).await?);
        }
    }
    Ok(())
}

fn read_notes(paths: &[PathBuf]) -> AppResult<Vec<Attachment>> {
    Ok(paths
        .iter()
        .map(Attachment::from_path)
        .collect::<std::io::Result<Vec<_>>>()?)
}

async fn lecture(client: &ApiClient, action: &LectureCommands) -> AppResult<()> {
    match action {
        LectureCommands::List {
            course_id,
            module_id,
        } => {
            let filter = LectureFilter {
                course_id: course_id.clone(),
                module_id: module_id.clone(),
            };
            let lectures = client
                .list_lectures(&PaginationParams::default(), &filter)
                .await?;
            for l in &lectures.items {
                println!("{:>3}. {} [{}]", l.order, l.title, l.id);
            }
        }
        LectureCommands::Show { id } => {
            let l = client.get_lecture(id).await?;
            println!("{} [{}]", l.title, l.id);
            if let Some(url) = l.embed_url() {
                println!("video: {url}");
            }
            for (i, note) in l.pdf_notes.iter().enumerate() {
                println!(
                    "note: {} {}",
                    lectern::utils::note_file_name(&l.title, i),
                    note.secure_url
                );
            }
        }
        LectureCommands::Create {
            module_id,
            course_id,
            title,
            video_url,
            notes,
        } => {
            require_admin(client)?;
            let form = LectureForm {
                title: title.clone(),
                video_url: video_url.clone(),
                module_id: Some(module_id.clone()),
                course_id: course_id.clone(),
                pdf_notes: read_notes(notes)?,
            };
            let l = client.create_lecture(&form).await?;
            println!("Lecture created: {} [{}]", l.title, l.id);
        }
        LectureCommands::Update {
            id,
            title,
            video_url,
            notes,
        } => {
            require_admin(client)?;
            let existing = client.get_lecture(id).await?;
            let form = LectureForm {
                title: title.clone().unwrap_or(existing.title),
                video_url: video_url.clone().unwrap_or(existing.video_url),
                module_id: None,
                course_id: None,
                pdf_notes: read_notes(notes)?,
            };
            let l = client.update_lecture(id, &form).await?;
            println!("Lecture updated: {} [{}]", l.title, l.id);
        }
        LectureCommands::Delete { id } => {
            require_admin(client)?;
            println!("{}", client.delete_lecture(id).await?);
        }
    }
    Ok(())
}

fn mark(lecture: &Lecture) -> &'static str {
    if lecture.completed() {
        "[x]"
    } else if lecture.locked() {
        "[#]"
    } else {
        "[ ]"
    }
}

fn print_current(session: &LearningSession<ApiClient>) {
    let player = session.player();
    match player.current() {
        Some(l) => {
            println!("Now playing: {}", l.title);
            if let Some(url) = l.embed_url() {
                println!("  {url}");
            }
            println!("Progress: {}%", player.progress_percentage().round());
        }
        None => println!("Course not available"),
    }
}

async fn learn(client: ApiClient, action: &LearnCommands) -> AppResult<()> {
    let mut session = LearningSession::new(Arc::new(client));

    match action {
        LearnCommands::Outline { course } => {
            session.open(course).await?;
            let player = session.player();
            let current = player.current().map(|l| l.id.clone());
            for group in player.sequence().group_by_module() {
                match group.module {
                    Some(m) => println!("Module {}: {}", m.module_number, m.title),
                    None => println!("Other lectures"),
                }
                for l in group.lectures {
                    let pointer = if current.as_deref() == Some(l.id.as_str()) { ">" } else { " " };
                    println!("{pointer} {} {}", mark(l), l.title);
                }
            }
            println!(
                "{}/{} completed",
                player.sequence().completed_count(),
                player.sequence().len()
            );
        }
        LearnCommands::Search { course, query } => {
            session.open(course).await?;
            let found = session.search(query);
            if found.is_empty() {
                println!("No lectures match \"{query}\"");
            }
            for l in found {
                println!("{} {} [{}]", mark(l), l.title, l.id);
            }
        }
        LearnCommands::Select { course, lecture } => {
            session.open(course).await?;
            let persist = session.select(lecture)?;
            print_current(&session);
            if let Err(e) = persist.await {
                tracing::warn!("current lecture update did not finish: {e}");
            }
        }
        LearnCommands::Complete { course } => {
            session.open(course).await?;
            match session.mark_current_complete().await? {
                Applied::Advanced { .. } => println!("Lecture marked as complete!"),
                Applied::Completed { .. } => println!("Lecture marked as complete! Course finished."),
                Applied::Stale | Applied::Ignored => {}
            }
            print_current(&session);
        }
        LearnCommands::Next { course } | LearnCommands::Prev { course } => {
            session.open(course).await?;
            let persist = match action {
                LearnCommands::Next { .. } => session.next()?,
                _ => session.previous()?,
            };
            match persist {
                Some(handle) => {
                    print_current(&session);
                    if let Err(e) = handle.await {
                        tracing::warn!("current lecture update did not finish: {e}");
                    }
                }
                None => println!("No lecture to move to"),
            }
        }
    }
    Ok(())
}

async fn progress(client: &ApiClient, action: &ProgressCommands) -> AppResult<()> {
    let records = client.user_progress().await?;
    match action {
        ProgressCommands::Dashboard => {
            let stats = DashboardStats::from_records(&records, chrono::Utc::now());
            println!("Enrolled courses:    {}", stats.total_courses);
            println!("Completed lectures:  {}", stats.completed_lectures);
            println!("Hours learned:       {}", stats.hours_learned);
            println!("Average progress:    {}%", stats.average_progress);
            println!("Completed courses:   {}", stats.completed_courses);
            println!("Learning streak:     {}", stats.streak);
        }
        ProgressCommands::List => {
            let overview = ProgressOverview::from_records(&records);
            for p in &records {
                let title = p.course_id.title().unwrap_or(p.course_id.id());
                println!(
                    "{:>5.1}%  {}  ({} lectures done)",
                    p.progress_percentage,
                    title,
                    p.completed_lectures.len()
                );
            }
            println!(
                "{} course(s), {} completed, {} lectures, {} hours",
                overview.total_courses,
                overview.completed_courses,
                overview.completed_lectures,
                overview.hours_learned
            );
        }
    }
    Ok(())
}

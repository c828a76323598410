//! `portal` command line: the public pages and the admin console of the
//! school website, backed by its REST API.

use crate::admin::{DashboardStats, FileSelection, FilesManager, NewsManager};
use crate::api::ApiClient;
use crate::auth::{AdminAuth, AuthState};
use crate::category::{CategoryFilter, CategoryStyle, ALL_CATEGORIES};
use crate::conf::Conf;
use crate::email_client::EmailClient;
use crate::error::ApiError;
use crate::notify::{Confirm, Level, NoticeLog, Notifier};
use crate::pages::{
    self, format_date, Admissions, DetailState, NewsDetailView, NewsFilter, NewsList, PostCard,
    ViewState,
};
use crate::session::{FileSessionStore, SessionHandle};
use anyhow::Context as _;
use clap::{Parser, Subcommand};
use interfacing::{ContactForm, FileCategory, LoginForm};
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "portal", about = "School website and admin console")]
pub struct Cli {
    /// Answer yes to every confirmation prompt.
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Open an admin session.
    /// The password is always read from the terminal.
    Login {
        #[arg(long)]
        user: Option<String>,
    },

    /// Close the admin session.
    Logout,

    /// Show whether an admin session is open.
    Status,

    /// Latest news, as on the home page.
    Home,

    News {
        #[command(subcommand)]
        action: NewsAction,
    },

    Files {
        #[command(subcommand)]
        action: FilesAction,
    },

    /// Enrollment forms available for download.
    Admissions,

    /// Enrollment requirements checklist.
    Requirements,

    /// Admin counters.
    Dashboard,

    /// Send a message through the contact form.
    Contact {
        #[arg(long)]
        nombres: String,
        #[arg(long)]
        apellidos: String,
        #[arg(long)]
        email: String,
        #[arg(long, default_value = "")]
        telefono: String,
        #[arg(long)]
        asunto: String,
        #[arg(long)]
        comentarios: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum NewsAction {
    List {
        #[arg(long, default_value = "")]
        search: String,
        #[arg(long, default_value = ALL_CATEGORIES)]
        category: String,
    },
    Show {
        id: u64,
    },
    Create {
        #[arg(long)]
        title: String,
        /// Category id, the first category when omitted.
        #[arg(long)]
        category: Option<u64>,
        #[command(flatten)]
        body: BodyArgs,
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Edit {
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        category: Option<u64>,
        #[command(flatten)]
        body: BodyArgs,
        /// Keeps the stored image when omitted.
        #[arg(long)]
        image: Option<PathBuf>,
    },
    Delete {
        id: u64,
    },
}

#[derive(clap::Args, Debug)]
pub struct BodyArgs {
    #[arg(long, conflicts_with = "body_file")]
    body: Option<String>,
    #[arg(long)]
    body_file: Option<PathBuf>,
}

impl BodyArgs {
    async fn read(self) -> anyhow::Result<Option<String>> {
        Ok(match (self.body, self.body_file) {
            (Some(body), _) => Some(body),
            (None, Some(path)) => Some(tokio::fs::read_to_string(&path).await?),
            (None, None) => None,
        })
    }
}

#[derive(Subcommand, Debug)]
pub enum FilesAction {
    List,
    Upload {
        path: PathBuf,
        /// Defaults to the file name without `.pdf`.
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        category: FileCategory,
    },
    Delete {
        id: u64,
    },
}

/// Confirmation on the terminal.
pub struct Prompt {
    pub assume_yes: bool,
}

impl Confirm for Prompt {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }

        eprint!("{} [s/N]: ", prompt);
        let mut answer = String::new();
        if std::io::stdin().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(
            answer.trim().to_lowercase().as_str(),
            "s" | "si" | "sí" | "y" | "yes"
        )
    }
}

struct Context {
    conf: Conf,
    client: ApiClient,
    notices: NoticeLog,
    notifier: Arc<dyn Notifier>,
    prompt: Prompt,
}

pub async fn run(cli: Cli, conf: Conf) -> anyhow::Result<()> {
    let store = Arc::new(FileSessionStore::new(conf.session.path.clone()));
    let session = SessionHandle::restore(store).await?;
    let client = ApiClient::new(&conf.api, session)?;
    let notices = NoticeLog::new();

    let ctx = Context {
        notifier: Arc::new(notices.clone()),
        notices,
        client,
        conf,
        prompt: Prompt {
            assume_yes: cli.yes,
        },
    };

    let result = dispatch(&ctx, cli.command).await;
    print_notices(&ctx.notices);

    if let Err(e) = &result {
        if e.downcast_ref::<ApiError>().map_or(false, ApiError::is_auth) {
            eprintln!("Ejecute `portal login` para iniciar sesión.");
        }
    }
    result
}

async fn dispatch(ctx: &Context, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login { user } => login(ctx, user).await,
        Command::Logout => {
            AdminAuth::new(ctx.client.clone()).logout().await?;
            println!("Sesión cerrada.");
            Ok(())
        }
        Command::Status => {
            match AdminAuth::new(ctx.client.clone()).state().await {
                AuthState::Unauthenticated => println!("Sin sesión."),
                AuthState::Authenticated { username } => println!(
                    "Sesión iniciada como {}.",
                    username.as_deref().unwrap_or("administrador")
                ),
            }
            Ok(())
        }
        Command::Home => {
            print_cards(&pages::landing(&ctx.client, ctx.notifier.as_ref()).await);
            Ok(())
        }
        Command::News { action } => news(ctx, action).await,
        Command::Files { action } => files(ctx, action).await,
        Command::Admissions => {
            match Admissions::load(&ctx.client, ctx.notifier.as_ref()).await {
                ViewState::Populated(admissions) => {
                    print_downloads("Planillas de nuevo ingreso", &admissions.new_enrollment);
                    print_downloads("Planillas de reingreso", &admissions.re_enrollment);
                    if !admissions.other.is_empty() {
                        print_downloads("Otros documentos", &admissions.other);
                    }
                }
                _ => println!("No hay planillas disponibles."),
            }
            Ok(())
        }
        Command::Requirements => {
            print_requirements("Educación Primaria", &pages::REQUIREMENTS_PRIMARY);
            print_requirements("Educación Media General", &pages::REQUIREMENTS_SECONDARY);
            Ok(())
        }
        Command::Dashboard => {
            if !ctx.client.session().is_authenticated().await {
                return Err(ApiError::Unauthenticated.into());
            }
            let stats = DashboardStats::fetch(&ctx.client).await?;
            println!("Noticias publicadas: {}", stats.news);
            println!("Archivos subidos:    {}", stats.files);
            Ok(())
        }
        Command::Contact {
            nombres,
            apellidos,
            email,
            telefono,
            asunto,
            comentarios,
        } => {
            let form = ContactForm {
                first_names: nombres,
                last_names: apellidos,
                email,
                phone: telefono,
                subject: asunto,
                comments: comentarios,
            };
            let email_client = EmailClient::from_conf(&ctx.conf.email)
                .context("Failed to build the email client")?;
            pages::send_contact(&email_client, &form, ctx.notifier.as_ref()).await?;
            Ok(())
        }
    }
}

async fn login(ctx: &Context, user: Option<String>) -> anyhow::Result<()> {
    let username = match user {
        Some(user) => user,
        None => {
            eprint!("Usuario: ");
            let mut user = String::new();
            std::io::stdin().read_line(&mut user)?;
            user.trim().to_string()
        }
    };
    let password = rpassword::prompt_password("Contraseña: ")?;

    let auth = AdminAuth::new(ctx.client.clone());
    match auth.login(LoginForm::new(username, password)).await {
        Ok(AuthState::Authenticated { username }) => {
            println!(
                "Bienvenido, {}.",
                username.as_deref().unwrap_or("administrador")
            );
            Ok(())
        }
        Ok(AuthState::Unauthenticated) => Ok(()),
        Err(e) => {
            eprintln!("{}", e.user_message());
            if matches!(e, ApiError::InvalidCredentials) {
                if let Ok(url) = auth.password_reset_url() {
                    eprintln!("¿Olvidó su contraseña? {}", url);
                }
            }
            Err(e.into())
        }
    }
}

async fn news(ctx: &Context, action: NewsAction) -> anyhow::Result<()> {
    match action {
        NewsAction::List { search, category } => {
            let list = NewsList::load(&ctx.client, ctx.notifier.as_ref()).await;
            let filter = NewsFilter::new(search, CategoryFilter::from_selection(&category));
            let cards = list.cards(&ctx.client, &filter);
            if cards.populated().is_some() {
                print_cards(&cards);
            } else {
                println!("{}", pages::NO_RESULTS);
            }
            println!("Categorías: {}", list.category_options().join(", "));
        }
        NewsAction::Show { id } => {
            let mut view = NewsDetailView::new(ctx.client.clone(), ctx.notifier.clone());
            match view.navigate(id).await {
                DetailState::Loaded(detail) => {
                    println!("[{}] {}", detail.category(), detail.post.title);
                    println!("{}", format_date(&detail.post.published_at));
                    if let Some(image) = detail.post.image.as_deref() {
                        if let Some(url) = ctx.client.media_url(image) {
                            println!("Imagen: {}", url);
                        }
                    }
                    println!();
                    println!("{}", detail.body_html());
                    if !detail.related.is_empty() {
                        println!();
                        println!("Más noticias:");
                        for card in &detail.related {
                            print_card(card);
                        }
                    }
                }
                _ => println!("Contenido no encontrado"),
            }
        }
        NewsAction::Create {
            title,
            category,
            body,
            image,
        } => {
            let mut manager = NewsManager::new(ctx.client.clone(), ctx.notifier.clone());
            manager.load().await?;

            let body = body.read().await?;
            let image = match image {
                Some(path) => Some(FileSelection::from_path(path).await?),
                None => None,
            };

            let form = manager.form_mut();
            form.title = title;
            if category.is_some() {
                form.category = category;
            }
            form.body = body.unwrap_or_default();
            form.image = image;

            manager.submit().await?;
        }
        NewsAction::Edit {
            id,
            title,
            category,
            body,
            image,
        } => {
            let mut manager = NewsManager::new(ctx.client.clone(), ctx.notifier.clone());
            manager.load().await?;
            manager.begin_edit(id)?;

            let body = body.read().await?;
            let image = match image {
                Some(path) => Some(FileSelection::from_path(path).await?),
                None => None,
            };

            let form = manager.form_mut();
            if let Some(title) = title {
                form.title = title;
            }
            if category.is_some() {
                form.category = category;
            }
            if let Some(body) = body {
                form.body = body;
            }
            form.image = image;

            manager.submit().await?;
        }
        NewsAction::Delete { id } => {
            let mut manager = NewsManager::new(ctx.client.clone(), ctx.notifier.clone());
            manager.delete(id, &ctx.prompt).await?;
        }
    }
    Ok(())
}

async fn files(ctx: &Context, action: FilesAction) -> anyhow::Result<()> {
    let mut manager = FilesManager::new(ctx.client.clone(), ctx.notifier.clone());

    match action {
        FilesAction::List => {
            manager.load().await?;
            if manager.files().is_empty() {
                println!("No hay archivos subidos.");
            }
            for file in manager.files() {
                println!(
                    "{:>5}  {:<14} {}  ({}, {})",
                    file.id,
                    CategoryStyle::of(&file.category).badge(),
                    file.title,
                    file.size_formatted.as_deref().unwrap_or("PDF"),
                    file.uploaded_at.format("%d/%m/%Y"),
                );
            }
        }
        FilesAction::Upload {
            path,
            title,
            category,
        } => {
            let selection = FileSelection::from_path(&path).await?;
            manager.select_file(selection)?;
            if let Some(title) = title {
                manager.set_title(title);
            }
            manager.set_category(category);
            manager.confirm_upload().await?;
        }
        FilesAction::Delete { id } => {
            manager.delete(id, &ctx.prompt).await?;
        }
    }
    Ok(())
}

fn print_notices(notices: &NoticeLog) {
    for notice in notices.drain() {
        match notice.level {
            Level::Success => println!("{}", notice.message),
            Level::Error => eprintln!("{}", notice.message),
        }
    }
}

fn print_card(card: &PostCard) {
    println!(
        "{:>5}  {}  [{}] {}",
        card.id,
        format_date(&card.published_at),
        card.category,
        card.title
    );
    if !card.excerpt.is_empty() {
        println!("       {}", card.excerpt);
    }
}

fn print_cards(cards: &ViewState<Vec<PostCard>>) {
    match cards {
        ViewState::Populated(cards) => cards.iter().for_each(print_card),
        _ => println!("No hay noticias publicadas."),
    }
}

fn print_downloads(heading: &str, downloads: &[pages::Download]) {
    println!("{}:", heading);
    if downloads.is_empty() {
        println!("  No hay planillas disponibles.");
    }
    for download in downloads {
        println!(
            "  {} ({}) {}",
            download.title,
            download.size,
            download.url.as_deref().unwrap_or("-")
        );
    }
}

fn print_requirements(heading: &str, requirements: &[pages::Requirement]) {
    println!("{}:", heading);
    for requirement in requirements {
        let marker = if requirement.is_special() { "!" } else { "-" };
        println!("  {} {}", marker, requirement.0);
    }
}

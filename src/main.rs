use anyhow::Context;
use clap::{Parser, Subcommand};
use dotenv::dotenv;
use std::fs;
use std::path::PathBuf;

use conditional_notify::conditions::store::codec;
use conditional_notify::conditions::{
    ConditionalNotifications, ConditionsAdmin, FormLoader, RequestGuard, RuleStore, SaveRequest,
    Settings, StaticToken, TrustedCaller,
};
use conditional_notify::host::{FileMeta, FormId, LogGateway, Record};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Form definitions file (YAML)
    #[arg(long, global = true)]
    forms: Option<PathBuf>,

    /// Directory holding stored conditions
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Show the condition editor data for a form
    Fields {
        #[arg(short, long)]
        form: FormId,
    },
    /// Print the stored conditions of a form
    Show {
        #[arg(short, long)]
        form: FormId,
    },
    /// Apply an admin save request (URL-encoded body)
    Save {
        /// The request body, or `@path` to read it from a file
        #[arg(short, long)]
        body: String,
    },
    /// Remove every condition of a form
    Clear {
        #[arg(short, long)]
        form: FormId,
    },
    /// Evaluate a submitted record (JSON) and send any conditional notification
    Decide {
        #[arg(short, long)]
        form: FormId,

        /// Path to the record JSON
        #[arg(short, long)]
        record: PathBuf,
    },
}

fn read_arg(value: &str) -> anyhow::Result<String> {
    match value.strip_prefix('@') {
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {}", path)),
        None => Ok(value.to_string()),
    }
}

fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let args = Args::parse();

    let mut settings = Settings::from_env();
    if let Some(forms) = args.forms {
        settings.forms = forms;
    }
    if let Some(store_dir) = args.store_dir {
        settings.store_dir = store_dir;
    }
    log::debug!("Using settings: {:?}", settings);

    let loader = FormLoader::new();
    let meta = FileMeta::open(&settings.store_dir)
        .with_context(|| format!("opening store {}", settings.store_dir.display()))?;
    let admin = ConditionsAdmin::new(RuleStore::new(meta.clone()));

    match args.command {
        Commands::Fields { form } => {
            let form = loader.load_form(&settings.forms, form)?;
            let view = admin.editor_view(&form)?;
            if view.missing_email_field {
                log::warn!(
                    "Form {} has no email field; conditional notifications cannot be addressed",
                    form.id
                );
            }
            println!("{}", serde_json::to_string_pretty(&view)?);
        }
        Commands::Show { form } => {
            let rules = admin.store().load(form)?;
            let stored: serde_json::Value = serde_json::from_str(&codec::encode(&rules)?)?;
            println!("{}", serde_json::to_string_pretty(&stored)?);
        }
        Commands::Save { body } => {
            let body = read_arg(&body)?;
            let Some(request) = SaveRequest::from_urlencoded(&body)? else {
                anyhow::bail!("not a condition save request (missing gfcn_submit)");
            };
            let form = loader.load_form(&settings.forms, request.form_id)?;

            let guard: Box<dyn RequestGuard> = match &settings.nonce {
                Some(token) => Box::new(StaticToken::new(token.clone())),
                None => Box::new(TrustedCaller),
            };
            let outcome = admin.handle(&form, request, guard.as_ref())?;
            println!("{} ({} stored)", outcome.notice, outcome.stored);
        }
        Commands::Clear { form } => {
            let form = loader.load_form(&settings.forms, form)?;
            admin.store().clear(&form)?;
            println!("Conditions cleared for form {}", form.id);
        }
        Commands::Decide { form, record } => {
            let form = loader.load_form(&settings.forms, form)?;
            let content = fs::read_to_string(&record)
                .with_context(|| format!("reading record {}", record.display()))?;
            let record: Record = serde_json::from_str(&content)?;

            let hook = ConditionalNotifications::new(
                RuleStore::new(meta),
                LogGateway::new(settings.admin_email.clone()),
            );
            let decision = hook.on_before_notify(&form, &record);
            println!("{}", serde_json::to_string_pretty(&decision)?);
        }
    }

    Ok(())
}

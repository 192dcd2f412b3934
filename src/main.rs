use clap::Parser;
use rut_intake::config::Command;
use rut_intake::domain::rut::{self, Rut};
use rut_intake::domain::ports::ConfigProvider;
use rut_intake::domain::summary;
use rut_intake::utils::error::ErrorSeverity;
use rut_intake::utils::{logger, validation::Validate};
use rut_intake::{CliConfig, IntakeError, IntakeForm, WebhookClient};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI config: {:?}", cli);

    let config = match cli.load() {
        Ok(config) => config,
        Err(e) => fail(e),
    };

    match &cli.command {
        Command::Check { rut: raw } => {
            let cleaned = rut::clean(raw);
            let result = rut::validate(&cleaned, config.strictness());
            println!("cleaned:   {}", cleaned);
            println!("formatted: {}", rut::format(&cleaned));
            match result.error {
                None => {
                    if let Ok(parsed) = Rut::parse(&cleaned, config.strictness()) {
                        println!("dotted:    {}", parsed.to_dotted());
                    }
                    println!("✅ valid ({})", config.strictness());
                }
                Some(e) => {
                    println!("❌ invalid: {}", e);
                    std::process::exit(1);
                }
            }
        }
        Command::Format { rut: raw } => {
            println!("{}", rut::format(raw));
        }
        Command::Submit(args) => {
            if let Err(e) = config.validate() {
                tracing::error!("❌ Configuration validation failed: {}", e);
                tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
                fail(e);
            }

            let draft = match args.to_draft() {
                Ok(draft) => draft,
                Err(e) => fail(e),
            };

            let client = WebhookClient::from_config(&config);
            tracing::info!("📡 Webhook: {}", client.url());
            let mut form = IntakeForm::from_config(client, &config);
            form.set_draft(draft);

            println!("{}", form.summary());

            if args.dry_run {
                tracing::info!("🔍 DRY RUN MODE - nothing will be sent");
                match form.validate() {
                    Ok(record) => {
                        println!("{}", summary::render_record(&record));
                        println!("{}", serde_json::to_string_pretty(&record)?);
                    }
                    Err(errors) => fail(IntakeError::ValidationError(errors)),
                }
                return Ok(());
            }

            match form.submit().await {
                Ok(receipt) => {
                    tracing::info!(
                        "✅ Record created at {} ({:?})",
                        receipt.submitted_at.to_rfc3339(),
                        receipt.elapsed
                    );
                    println!("✅ Datos enviados correctamente");
                    if let Some(message) = &receipt.reply.message {
                        println!("{}", message);
                    }
                }
                Err(IntakeError::ValidationError(errors)) => {
                    for (field, message) in errors.iter() {
                        eprintln!("  ✗ {}: {}", field, message);
                    }
                    fail(IntakeError::ValidationError(errors));
                }
                Err(e) => fail(e),
            }
        }
    }

    Ok(())
}

fn fail(e: IntakeError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
    eprintln!("❌ {}", e.user_friendly_message());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

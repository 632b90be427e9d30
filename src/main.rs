//! Walkthrough Bot
//!
//! Main application entry point

use std::sync::Arc;
use teloxide::{prelude::*, types::Update};
use teloxide::dispatching::UpdateHandler;
use tracing::{error, info, warn};

use walkthrough_bot::{
    config::{Settings, StorageBackend},
    engine::WalkthroughService,
    handlers::{handle_command, handle_message, Command},
    scripts::ScriptRegistry,
    state::{InMemoryStateStore, RedisStateStore, StateStore},
    utils::logging,
};

type HandlerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv::dotenv().ok();

    // Load configuration
    let settings = Settings::new()?;
    settings.validate()?;

    // Initialize logging
    let _log_guard = logging::init_logging(&settings.logging)?;

    info!("Starting {}...", walkthrough_bot::info());

    // Load scripts; any malformed script stops startup here
    let mut registry = ScriptRegistry::with_builtins()?;
    for path in &settings.walkthrough.script_files {
        registry.load_file(path).await?;
    }
    let walkthrough = registry.require(&settings.walkthrough.script)?;
    info!(script_id = walkthrough.id(), user_steps = walkthrough.num_user_steps(), "Active walkthrough selected");

    // Initialize state storage
    let store: Arc<dyn StateStore> = match settings.storage.backend {
        StorageBackend::Memory => {
            warn!("Using in-memory state storage; progress is lost on restart");
            Arc::new(InMemoryStateStore::new())
        }
        StorageBackend::Redis => {
            info!("Connecting to Redis...");
            let redis_store = RedisStateStore::new(settings.redis.clone()).await?;
            redis_store.test_connection().await?;
            Arc::new(redis_store)
        }
    };

    let service = Arc::new(WalkthroughService::new(walkthrough, store));

    // Initialize bot
    let bot = Bot::new(&settings.bot.token);

    let mut dispatcher = Dispatcher::builder(bot, create_handler())
        .dependencies(dptree::deps![service])
        .default_handler(|upd| async move {
            warn!("Unhandled update: {:?}", upd);
        })
        .enable_ctrlc_handler()
        .build();

    info!("Starting bot with polling mode...");
    dispatcher.dispatch().await;

    info!("Walkthrough bot has been shut down.");
    Ok(())
}

/// Create the main update handler
fn create_handler() -> UpdateHandler<Box<dyn std::error::Error + Send + Sync + 'static>> {
    use teloxide::dispatching::UpdateFilterExt;

    dptree::entry().branch(
        Update::filter_message()
            .branch(
                // Handle commands
                dptree::entry()
                    .filter_command::<Command>()
                    .endpoint(handle_commands),
            )
            .branch(
                // Everything else is a walkthrough reply
                dptree::endpoint(handle_messages),
            ),
    )
}

/// Handle bot commands
async fn handle_commands(
    bot: Bot,
    msg: Message,
    cmd: Command,
    service: Arc<WalkthroughService>,
) -> HandlerResult {
    if let Err(e) = handle_command(bot, msg, cmd, service).await {
        error!(error = %e, severity = %e.severity(), "Error handling command");
        return Err(e.into());
    }

    Ok(())
}

/// Handle regular messages
async fn handle_messages(
    bot: Bot,
    msg: Message,
    service: Arc<WalkthroughService>,
) -> HandlerResult {
    if let Err(e) = handle_message(bot, msg, service).await {
        error!(error = %e, severity = %e.severity(), recoverable = e.is_recoverable(), "Error handling message");
        return Err(e.into());
    }

    Ok(())
}

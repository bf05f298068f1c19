//! Login and end-to-end encryption setup.
//!
//! The bot either logs in with its password and sets up cross-signing, key
//! backup and secret storage, or restores the saved login and imports its
//! secrets with the recovery passphrase. Both paths end with the device
//! verified, so the bot can read and write in encrypted rooms.

use anyhow::{Context, anyhow, bail};
use log::{debug, info};
use matrix_sdk::{
    Client,
    encryption::{
        BackupDownloadStrategy, EncryptionSettings,
        recovery::{RecoveryError, RecoveryState},
    },
    ruma::{OwnedUserId, api::client::uiaa},
};

use crate::matrix::{UserCredentials, session::SessionStore};

/// Name given to the bot device on first login.
const DEVICE_NAME: &str = "dune helper bot";

/// Returns a logged in client with encryption ready.
///
/// # Errors
///
/// Returns an error if login, restoration or any encryption step fails, or if
/// the device ends up unverified.
pub async fn connect(
    credentials: &UserCredentials,
    sessions: &SessionStore,
) -> Result<Client, anyhow::Error> {
    info!("connecting matrix client for {}", credentials.user_id);

    if sessions.has_session() {
        restore(credentials, sessions).await
    } else {
        login(credentials, sessions).await
    }
}

async fn build_client(
    credentials: &UserCredentials,
    sessions: &SessionStore,
    settings: EncryptionSettings,
) -> Result<(Client, OwnedUserId), anyhow::Error> {
    let user_id: OwnedUserId = credentials.user_id.as_str().try_into()?;
    let client = Client::builder()
        .server_name(user_id.server_name())
        .sqlite_store(sessions.sqlite_path(), Some(&credentials.passphrase))
        .with_encryption_settings(settings)
        .build()
        .await?;
    Ok((client, user_id))
}

async fn login(
    credentials: &UserCredentials,
    sessions: &SessionStore,
) -> Result<Client, anyhow::Error> {
    let settings = EncryptionSettings {
        auto_enable_cross_signing: true,
        backup_download_strategy: BackupDownloadStrategy::default(),
        auto_enable_backups: true,
    };
    let (client, user_id) = build_client(credentials, sessions, settings).await?;

    client
        .matrix_auth()
        .login_username(user_id, &credentials.password)
        .initial_device_display_name(DEVICE_NAME)
        .send()
        .await?;
    debug!("logged in");

    bootstrap_cross_signing(&client, credentials).await?;
    enable_recovery(&client, &credentials.passphrase).await?;

    client
        .encryption()
        .recovery()
        .recover(&credentials.passphrase)
        .await?;
    debug!("secrets recovered");

    check_encryption(&client).await?;

    let user_session = client
        .matrix_auth()
        .session()
        .ok_or_else(|| anyhow!("no session after login"))?;
    sessions
        .save_user_session(&user_session)
        .await
        .context("failed to save user session")?;

    info!("matrix login complete");
    Ok(client)
}

async fn restore(
    credentials: &UserCredentials,
    sessions: &SessionStore,
) -> Result<Client, anyhow::Error> {
    info!("restoring matrix session");

    let (client, _) = build_client(credentials, sessions, EncryptionSettings::default()).await?;

    let user_session = sessions
        .user_session()
        .ok_or_else(|| anyhow!("no session to restore"))?;
    client.restore_session(user_session.clone()).await?;

    client
        .encryption()
        .secret_storage()
        .open_secret_store(&credentials.passphrase)
        .await
        .context("failed to open secret storage")?
        .import_secrets()
        .await
        .context("failed to import secrets")?;

    check_encryption(&client).await?;

    info!("matrix session restored");
    Ok(client)
}

/// Sets up cross-signing, answering the password challenge when the server asks.
async fn bootstrap_cross_signing(
    client: &Client,
    credentials: &UserCredentials,
) -> Result<(), anyhow::Error> {
    let Err(e) = client
        .encryption()
        .bootstrap_cross_signing_if_needed(None)
        .await
    else {
        debug!("cross signing already set up");
        return Ok(());
    };

    let response = e
        .as_uiaa_response()
        .ok_or_else(|| anyhow!("cross signing bootstrap failed: {:?}", e))?;
    let mut password = uiaa::Password::new(
        uiaa::UserIdentifier::UserIdOrLocalpart(credentials.user_id.clone()),
        credentials.password.clone(),
    );
    password.session = response.session.clone();

    client
        .encryption()
        .bootstrap_cross_signing(Some(uiaa::AuthData::Password(password)))
        .await?;

    debug!("cross signing set up");
    Ok(())
}

/// Enables key backup and secret storage, accepting an existing backup.
async fn enable_recovery(client: &Client, passphrase: &str) -> Result<(), anyhow::Error> {
    match client
        .encryption()
        .recovery()
        .enable()
        .with_passphrase(passphrase)
        .await
    {
        Ok(_) => debug!("recovery enabled"),
        Err(RecoveryError::BackupExistsOnServer) => debug!("recovery already enabled"),
        Err(e) => bail!("error enabling recovery: {:?}", e),
    }
    Ok(())
}

async fn check_encryption(client: &Client) -> Result<(), anyhow::Error> {
    if client.encryption().recovery().state() != RecoveryState::Enabled {
        bail!("recovery is not enabled");
    }

    let device = client
        .encryption()
        .get_own_device()
        .await?
        .ok_or_else(|| anyhow!("own device not found"))?;
    if !device.is_verified() {
        bail!("device is not verified");
    }

    Ok(())
}

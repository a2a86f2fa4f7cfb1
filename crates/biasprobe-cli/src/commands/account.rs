//! The `biasprobe register`, `login`, `logout`, and `whoami` commands.

use anyhow::Result;

use biasprobe_auth::{AuthState, BiasprobeConfig};

use super::open_auth;

pub async fn register(config: &BiasprobeConfig, username: &str, password: &str) -> Result<()> {
    let mut auth = open_auth(config).await;
    let user = auth.register(username, password).await?;
    println!("Registered and signed in as {}", user.username);
    Ok(())
}

pub async fn login(config: &BiasprobeConfig, username: &str, password: &str) -> Result<()> {
    let mut auth = open_auth(config).await;
    let user = auth.login(username, password).await?;
    println!("Signed in as {}", user.username);
    Ok(())
}

pub async fn logout(config: &BiasprobeConfig) -> Result<()> {
    let mut auth = open_auth(config).await;
    if auth.current_user().is_none() {
        println!("Not signed in.");
        return Ok(());
    }
    auth.logout().await?;
    println!("Signed out.");
    Ok(())
}

pub async fn whoami(config: &BiasprobeConfig) -> Result<()> {
    let auth = open_auth(config).await;
    match auth.state() {
        AuthState::Authenticated(user) => println!("{} ({})", user.username, user.id),
        AuthState::Anonymous | AuthState::Loading => println!("Not signed in."),
    }
    Ok(())
}

#[derive(clap::Parser)]
pub struct Config {
    #[arg(long, env, default_value = "sqlite://warbler.db")]
    pub database_url: String,

    #[arg(long, env)]
    pub session_signing_key: SessionSigningKey,

    #[arg(long, env, default_value = "0.0.0.0:8080")]
    pub listen_addr: std::net::SocketAddr,
}

#[derive(Clone)]
pub struct SessionSigningKey(pub hmac::Hmac<sha2::Sha384>);

impl std::str::FromStr for SessionSigningKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        use hmac::Mac;

        Ok(Self(
            hmac::Hmac::<sha2::Sha384>::new_from_slice(s.as_bytes())
                .map_err(|e| format!("Failed to parse hmac: {e:?}"))?,
        ))
    }
}

//! The registry facade.
//!
//! [`Registry`] wires the allocator, both stores, the authentication gate,
//! and the expiration policy together behind one API. It holds no mutable
//! state of its own; all shared state lives in storage.

use std::{collections::BTreeMap, sync::Arc};

use chrono::{DateTime, Utc};
use handles_store::SqlClient;
use handles_types::{
    config::{ConfigError, RegistryConfig, SecretConfig},
    validation, Clock, Identifier, ImmutableRecord, MutableRecord, Namespace, OsRandom,
    SuffixSource, SystemClock,
};
use tracing::{debug, info, warn};

use crate::{
    allocator::allocate_suffix,
    auth::AuthGate,
    error::{RegistryError, Result},
    expiration::{find_live, ExpirationPolicy},
    immutable::ImmutableStore,
    metrics::{self, ReclaimPath},
    mutable::MutableStore,
    request::{Destination, IssueRequest},
    store::{IdentifierStore, MutableIdentifierStore},
};

/// Outcome of sweeping both namespaces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SweepReport {
    /// Records removed per namespace that swept successfully.
    pub reclaimed: BTreeMap<Namespace, u64>,
    /// Error message per namespace whose sweep failed.
    pub failures: BTreeMap<Namespace, String>,
}

impl SweepReport {
    /// Total records removed across namespaces.
    pub fn total_reclaimed(&self) -> u64 {
        self.reclaimed.values().sum()
    }

    /// Whether every namespace swept without error.
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }

    fn record(&mut self, namespace: Namespace, outcome: Result<u64>) {
        match outcome {
            Ok(count) => {
                self.reclaimed.insert(namespace, count);
            },
            Err(err) => {
                self.failures.insert(namespace, err.to_string());
            },
        }
    }
}

/// Identifier registry over the `inco` and `link` namespaces.
pub struct Registry {
    inco: ImmutableStore,
    link: MutableStore,
    config: RegistryConfig,
    expiration: ExpirationPolicy,
    auth: Option<AuthGate>,
    clock: Arc<dyn Clock>,
    suffixes: Arc<dyn SuffixSource>,
}

#[bon::bon]
impl Registry {
    /// Creates a registry over `client`.
    ///
    /// Without a `secret`, `link` issuance and mutations fail with
    /// [`RegistryError::Misconfigured`] while `inco` keeps working.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `config` is invalid.
    #[builder]
    pub fn new(
        client: Arc<dyn SqlClient>,
        #[builder(default)] config: RegistryConfig,
        secret: Option<SecretConfig>,
        #[builder(default = default_clock())] clock: Arc<dyn Clock>,
        #[builder(default = default_suffixes())] suffixes: Arc<dyn SuffixSource>,
    ) -> std::result::Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            inco: ImmutableStore::new(Arc::clone(&client)),
            link: MutableStore::new(client),
            expiration: ExpirationPolicy::new(config.expiration),
            config,
            auth: secret.map(AuthGate::new),
            clock,
            suffixes,
        })
    }
}

fn default_clock() -> Arc<dyn Clock> {
    Arc::new(SystemClock)
}

fn default_suffixes() -> Arc<dyn SuffixSource> {
    Arc::new(OsRandom)
}

impl Registry {
    /// The active configuration.
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// The append-only store.
    pub fn inco_store(&self) -> &ImmutableStore {
        &self.inco
    }

    /// The password-protected store.
    pub fn link_store(&self) -> &MutableStore {
        &self.link
    }

    fn gate(&self) -> Result<&AuthGate> {
        self.auth.as_ref().ok_or_else(|| RegistryError::Misconfigured {
            message: "HMAC_SECRET is not configured".to_string(),
        })
    }

    async fn allocate<S>(&self, store: &S) -> Result<u32>
    where
        S: IdentifierStore + ?Sized,
    {
        let result = allocate_suffix(&self.config.suffix, self.suffixes.as_ref(), |candidate| {
            store.suffix_exists(candidate)
        })
        .await;
        if let Err(RegistryError::SuffixExhausted { attempts, .. }) = &result {
            metrics::record_suffix_exhausted(store.namespace());
            warn!(namespace = %store.namespace(), attempts, "Suffix allocation exhausted");
        }
        result
    }

    // =========================================================================
    // Issuance and resolution
    // =========================================================================

    /// Issues a new identifier.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::SuffixExhausted`] if no free suffix was found.
    /// - [`RegistryError::DuplicateSuffix`] if a concurrent issuance won the
    ///   suffix; callers should retry.
    /// - [`RegistryError::Misconfigured`] for `link` without a secret.
    pub async fn issue(&self, request: IssueRequest) -> Result<Identifier> {
        match request {
            IssueRequest::Inco { username, destination } => {
                let suffix = self.allocate(&self.inco).await?;
                let identifier = Identifier::new(username, suffix, Namespace::Inco);
                let now = self.clock.now();
                let record = ImmutableRecord {
                    id: self.suffixes.opaque_id(),
                    username: identifier.username().to_string(),
                    suffix,
                    identifier: identifier.to_string(),
                    destination_uri: destination.into_inner(),
                    created_at: now,
                    expires_at: self.expiration.expires_at(Namespace::Inco, now),
                };
                self.inco.create(&record).await?;
                metrics::record_issued(Namespace::Inco);
                info!(identifier = %identifier, expires_at = %record.expires_at, "Issued identifier");
                Ok(identifier)
            },
            IssueRequest::Link { username, password, destination } => {
                let password_hash = self.gate()?.hash_password(&password);
                let suffix = self.allocate(&self.link).await?;
                let identifier = Identifier::new(username, suffix, Namespace::Link);
                let now = self.clock.now();
                let record = MutableRecord {
                    id: self.suffixes.opaque_id(),
                    username: identifier.username().to_string(),
                    suffix,
                    identifier: identifier.to_string(),
                    password_hash,
                    destination_uri: destination.into_inner(),
                    created_at: now,
                    expires_at: self.expiration.expires_at(Namespace::Link, now),
                    last_renewed_at: now,
                };
                self.link.create(&record).await?;
                metrics::record_issued(Namespace::Link);
                info!(identifier = %identifier, expires_at = %record.expires_at, "Issued identifier");
                Ok(identifier)
            },
        }
    }

    /// Resolves an identifier in either namespace to its destination URI.
    ///
    /// Expired records are deleted on read and reported as missing.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Validation`] for a malformed identifier.
    /// - [`RegistryError::NotFound`] if missing or expired.
    pub async fn resolve(&self, identifier: &str) -> Result<String> {
        let parsed = Identifier::parse(identifier)?;
        let now = self.clock.now();
        let destination = match parsed.namespace() {
            Namespace::Inco => find_live(&self.inco, identifier, now).await?.destination_uri,
            Namespace::Link => find_live(&self.link, identifier, now).await?.destination_uri,
        };
        debug!(identifier, "Resolved identifier");
        Ok(destination)
    }

    // =========================================================================
    // Authenticated link mutations
    // =========================================================================

    async fn authenticate(&self, identifier: &str, password: &str) -> Result<MutableRecord> {
        Identifier::parse_in(identifier, Namespace::Link)?;
        validation::validate_password(password)?;
        let gate = self.gate()?;
        gate.authenticate(&self.link, identifier, password, self.clock.now()).await
    }

    /// Replaces the destination of an owned `link` identifier.
    ///
    /// # Errors
    ///
    /// Fails with [`RegistryError::NotFound`], [`RegistryError::Expired`], or
    /// [`RegistryError::AuthFailed`] per the authentication protocol.
    pub async fn update_destination(
        &self,
        identifier: &str,
        password: &str,
        destination: Destination,
    ) -> Result<()> {
        self.authenticate(identifier, password).await?;
        if !self.link.update_destination(identifier, destination.as_str()).await? {
            return Err(RegistryError::not_found(identifier));
        }
        info!(identifier, "Updated identifier destination");
        Ok(())
    }

    /// Renames the owner of a `link` identifier, keeping its suffix.
    ///
    /// Returns the new identifier.
    ///
    /// # Errors
    ///
    /// - Authentication failures as for [`Registry::update_destination`].
    /// - [`RegistryError::IdentifierTaken`] if the new identifier belongs to
    ///   another record.
    pub async fn rename_owner(
        &self,
        identifier: &str,
        password: &str,
        new_username: &str,
    ) -> Result<Identifier> {
        let username = validation::validate_username(new_username)?;
        let record = self.authenticate(identifier, password).await?;

        let renamed = Identifier::new(username, record.suffix, Namespace::Link);
        let new_identifier = renamed.to_string();
        if new_identifier != identifier
            && self.link.find_by_identifier(&new_identifier).await?.is_some()
        {
            return Err(RegistryError::IdentifierTaken { identifier: new_identifier });
        }

        if !self.link.update_username(identifier, renamed.username(), &new_identifier).await? {
            return Err(RegistryError::not_found(identifier));
        }
        info!(previous = identifier, identifier = %renamed, "Renamed identifier");
        Ok(renamed)
    }

    /// Deletes an owned `link` identifier.
    ///
    /// # Errors
    ///
    /// Authentication failures as for [`Registry::update_destination`].
    pub async fn delete_owned(&self, identifier: &str, password: &str) -> Result<()> {
        self.authenticate(identifier, password).await?;
        if !self.link.delete(identifier).await? {
            return Err(RegistryError::not_found(identifier));
        }
        info!(identifier, "Deleted identifier at owner request");
        Ok(())
    }

    /// Pushes the expiry of an owned `link` identifier one full TTL past now.
    ///
    /// Returns the new expiry.
    ///
    /// # Errors
    ///
    /// Authentication failures as for [`Registry::update_destination`].
    pub async fn renew(&self, identifier: &str, password: &str) -> Result<DateTime<Utc>> {
        self.authenticate(identifier, password).await?;
        let now = self.clock.now();
        let expires_at = self.expiration.expires_at(Namespace::Link, now);
        if !self.link.renew(identifier, expires_at, now).await? {
            return Err(RegistryError::not_found(identifier));
        }
        debug!(identifier, expires_at = %expires_at, "Renewed identifier");
        Ok(expires_at)
    }

    /// Error returned for any update or delete aimed at the `inco` namespace.
    pub fn reject_immutable_mutation(&self, identifier: &str) -> RegistryError {
        RegistryError::ImmutableViolation { identifier: identifier.to_string() }
    }

    // =========================================================================
    // Sweeping
    // =========================================================================

    /// Deletes every expired record in `namespace`.
    ///
    /// # Errors
    ///
    /// Returns the storage error if the cleanup statement fails.
    pub async fn sweep_expired(&self, namespace: Namespace) -> Result<u64> {
        let now = self.clock.now();
        let reclaimed = match namespace {
            Namespace::Inco => self.inco.cleanup_expired(now).await?,
            Namespace::Link => self.link.cleanup_expired(now).await?,
        };
        if reclaimed > 0 {
            metrics::record_reclaimed(namespace, ReclaimPath::Sweep, reclaimed);
            info!(%namespace, reclaimed, "Swept expired identifiers");
        } else {
            debug!(%namespace, "Sweep found nothing to reclaim");
        }
        Ok(reclaimed)
    }

    /// Sweeps both namespaces concurrently. A failure in one does not stop
    /// the other.
    pub async fn sweep_all(&self) -> SweepReport {
        let (inco, link) =
            tokio::join!(self.sweep_expired(Namespace::Inco), self.sweep_expired(Namespace::Link));
        let mut report = SweepReport::default();
        report.record(Namespace::Inco, inco);
        report.record(Namespace::Link, link);
        report
    }
}

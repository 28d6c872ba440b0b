//! Command implementations

pub mod config;
pub mod configure;
pub mod install;
pub mod service;
pub mod snapshot;
pub mod status;
pub mod update;
pub mod version;

use crate::application::services::install::NodeHost;
use crate::domain::config::QnodeConfig;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::fs::StdFs;
use crate::infra::git::GitSourceFetcher;
use crate::infra::http::UreqReleaseClient;
use crate::infra::state::StateManager;
use crate::infra::systemd::SystemdServiceManager;

/// Production implementations of every port a node operation touches.
pub struct HostPorts {
    pub runner: TokioCommandRunner,
    pub release: UreqReleaseClient,
    pub fs: StdFs,
    pub services: SystemdServiceManager<TokioCommandRunner>,
    pub source: GitSourceFetcher<TokioCommandRunner>,
}

impl HostPorts {
    #[must_use]
    pub fn new(config: &QnodeConfig) -> Self {
        Self {
            runner: TokioCommandRunner::default(),
            release: UreqReleaseClient::new(),
            fs: StdFs,
            services: SystemdServiceManager::new(
                TokioCommandRunner::default(),
                config.service.unit_dir.clone(),
            ),
            source: GitSourceFetcher::new(TokioCommandRunner::default()),
        }
    }

    #[must_use]
    pub fn host<'a>(
        &'a self,
        records: &'a StateManager,
    ) -> NodeHost<
        'a,
        TokioCommandRunner,
        UreqReleaseClient,
        StdFs,
        SystemdServiceManager<TokioCommandRunner>,
        StateManager,
        GitSourceFetcher<TokioCommandRunner>,
    > {
        NodeHost {
            runner: &self.runner,
            release: &self.release,
            fs: &self.fs,
            services: &self.services,
            records,
            source: &self.source,
        }
    }
}

use crate::domain::model::{CyberScores, EmbassyRecord, RssSnapshot};
use serde::Serialize;

/// 只透過 [`ViewState::reduce`] 更新
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ViewState {
    pub embassies: Vec<EmbassyRecord>,
    pub rss: RssSnapshot,
    pub scores: CyberScores,
    pub loading: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    ScoresLoaded(CyberScores),
    RssLoaded(RssSnapshot),
    EmbassiesLoaded(Vec<EmbassyRecord>),
    LoadFinished,
}

impl ViewState {
    pub fn initial() -> Self {
        Self {
            loading: true,
            ..Self::default()
        }
    }

    pub fn reduce(self, action: Action) -> Self {
        match action {
            Action::ScoresLoaded(scores) => Self { scores, ..self },
            Action::RssLoaded(rss) => Self { rss, ..self },
            Action::EmbassiesLoaded(embassies) => Self { embassies, ..self },
            Action::LoadFinished => Self {
                loading: false,
                ..self
            },
        }
    }

    pub fn online_count(&self) -> usize {
        self.embassies.iter().filter(|e| e.is_online()).count()
    }
}

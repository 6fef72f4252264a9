//! Command provider answered over channels.
//!
//! [`ChannelCommandProvider`] forwards every prompt to a [`PromptHandle`],
//! typically owned by a UI task, and waits for the reply on a oneshot
//! channel. Prompts carry a snapshot of the battle so the receiving side
//! does not need access to the runtime.

use async_trait::async_trait;
use battle_core::{BattleState, CombatantId};
use tokio::sync::{mpsc, oneshot};

use crate::api::{
    BattleView, CommandProvider, CommandRequest, CommandResponse, Result, RuntimeError,
    TargetRequest,
};

/// One question for the UI, with the channel to answer it on.
#[derive(Debug)]
pub enum Prompt {
    Command {
        request: CommandRequest,
        state: Box<BattleState>,
        reply: oneshot::Sender<CommandResponse>,
    },
    /// Reply with an empty list to cancel back to command entry.
    Targets {
        request: TargetRequest,
        state: Box<BattleState>,
        reply: oneshot::Sender<Vec<CombatantId>>,
    },
}

impl Prompt {
    pub fn combatant(&self) -> CombatantId {
        match self {
            Prompt::Command { request, .. } => request.combatant,
            Prompt::Targets { request, .. } => request.combatant,
        }
    }
}

/// Creates a connected provider and prompt handle.
pub fn channel(buffer: usize) -> (ChannelCommandProvider, PromptHandle) {
    let (prompts, receiver) = mpsc::channel(buffer.max(1));
    (ChannelCommandProvider { prompts }, PromptHandle { receiver })
}

#[derive(Clone, Debug)]
pub struct ChannelCommandProvider {
    prompts: mpsc::Sender<Prompt>,
}

/// Receiving end of a [`ChannelCommandProvider`].
#[derive(Debug)]
pub struct PromptHandle {
    receiver: mpsc::Receiver<Prompt>,
}

impl PromptHandle {
    /// Next prompt, or `None` once the provider is dropped.
    pub async fn next(&mut self) -> Option<Prompt> {
        self.receiver.recv().await
    }
}

#[async_trait]
impl CommandProvider for ChannelCommandProvider {
    async fn select_command(
        &self,
        request: &CommandRequest,
        view: BattleView<'_>,
    ) -> Result<CommandResponse> {
        let (reply, response) = oneshot::channel();
        self.prompts
            .send(Prompt::Command {
                request: request.clone(),
                state: Box::new(view.state.clone()),
                reply,
            })
            .await
            .map_err(|_| RuntimeError::PromptChannelClosed)?;

        response.await.map_err(RuntimeError::ReplyChannelClosed)
    }

    async fn select_targets(
        &self,
        request: &TargetRequest,
        view: BattleView<'_>,
    ) -> Result<Vec<CombatantId>> {
        let (reply, response) = oneshot::channel();
        self.prompts
            .send(Prompt::Targets {
                request: request.clone(),
                state: Box::new(view.state.clone()),
                reply,
            })
            .await
            .map_err(|_| RuntimeError::PromptChannelClosed)?;

        response.await.map_err(RuntimeError::ReplyChannelClosed)
    }
}

#[cfg(test)]
mod tests {
    use battle_content::CatalogLoader;
    use battle_core::{
        BattleConfig, BattleStats, CombatantState, EncounterKind, Formation, MoveId, Party, Roster,
    };

    use super::*;
    use crate::api::CommandChoice;

    fn state() -> BattleState {
        let member = || {
            CombatantState::new(
                "m",
                10,
                50,
                BattleStats {
                    attack: 10,
                    defense: 10,
                    speed: 10,
                },
            )
            .with_move(MoveId(1), 35)
        };
        let config = BattleConfig::new(Formation::Single, EncounterKind::Wild, 0);
        BattleState::new(
            &config,
            Roster::new(Party::new(vec![member()]), Party::new(vec![member()])),
        )
    }

    fn request() -> CommandRequest {
        CommandRequest {
            combatant: CombatantId::PLAYER,
            turn: 1,
            legal_moves: vec![0],
            bench: Vec::new(),
            can_transform: true,
            can_capture: true,
            can_flee: true,
            rejection: None,
            decision_seed: 0,
        }
    }

    #[tokio::test]
    async fn prompt_round_trips_through_handle() {
        let catalog = CatalogLoader::builtin().unwrap();
        let state = state();
        let (provider, mut handle) = channel(4);

        let ui = tokio::spawn(async move {
            match handle.next().await {
                Some(Prompt::Command { request, reply, .. }) => {
                    assert_eq!(request.combatant, CombatantId::PLAYER);
                    reply
                        .send(CommandResponse::Selected(CommandChoice::Flee))
                        .unwrap();
                }
                other => panic!("unexpected prompt: {other:?}"),
            }
        });

        let response = provider
            .select_command(&request(), BattleView::new(&state, &catalog))
            .await
            .unwrap();
        assert_eq!(response, CommandResponse::Selected(CommandChoice::Flee));
        ui.await.unwrap();
    }

    #[tokio::test]
    async fn dropped_handle_closes_provider() {
        let catalog = CatalogLoader::builtin().unwrap();
        let state = state();
        let (provider, handle) = channel(1);
        drop(handle);

        let err = provider
            .select_command(&request(), BattleView::new(&state, &catalog))
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::PromptChannelClosed));
    }

    #[tokio::test]
    async fn dropped_reply_is_reported() {
        let catalog = CatalogLoader::builtin().unwrap();
        let state = state();
        let (provider, mut handle) = channel(1);

        let ui = tokio::spawn(async move {
            let prompt = handle.next().await;
            drop(prompt);
        });

        let err = provider
            .select_command(&request(), BattleView::new(&state, &catalog))
            .await
            .unwrap_err();
        assert!(matches!(err, RuntimeError::ReplyChannelClosed(_)));
        ui.await.unwrap();
    }
}

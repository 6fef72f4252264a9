//! Line-based terminal play and battle narration.
use std::sync::Arc;

use anyhow::Result;
use battle_core::{BattleEffect, BattleState, CombatantId, ContentOracle, Side, TargetList};
use runtime::{
    BattleEvent, CommandChoice, CommandRequest, CommandResponse, Event, Prompt, PromptHandle,
    TargetRequest,
};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tokio::sync::broadcast;

const COMMAND_HELP: &str =
    "f <move>  t <move>  s <member>  c <device> <enemy>  r (run)  b (back)";

/// Answers player prompts from stdin until the provider side goes away.
pub async fn serve(mut prompts: PromptHandle, content: Arc<dyn ContentOracle>) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    while let Some(prompt) = prompts.next().await {
        match prompt {
            Prompt::Command {
                request,
                state,
                reply,
            } => {
                show_command_prompt(&request, &state, content.as_ref());
                let Some(response) = read_until(&mut lines, |line| {
                    parse_command(line, &request, &state)
                })
                .await?
                else {
                    break;
                };
                let _ = reply.send(response);
            }
            Prompt::Targets {
                request,
                state,
                reply,
            } => {
                show_target_prompt(&request, &state);
                let Some(targets) =
                    read_until(&mut lines, |line| parse_targets(line, &request.legal)).await?
                else {
                    break;
                };
                let _ = reply.send(targets);
            }
        }
    }
    Ok(())
}

/// Reads lines until `parse` accepts one. `None` on end of input.
async fn read_until<T>(
    lines: &mut Lines<BufReader<Stdin>>,
    parse: impl Fn(&str) -> Option<T>,
) -> Result<Option<T>> {
    loop {
        let Some(line) = lines.next_line().await? else {
            return Ok(None);
        };
        match parse(line.trim()) {
            Some(value) => return Ok(Some(value)),
            None => println!("  ? {COMMAND_HELP}"),
        }
    }
}

fn show_command_prompt(request: &CommandRequest, state: &BattleState, content: &dyn ContentOracle) {
    let Some(member) = state.combatant(request.combatant) else {
        return;
    };
    if let Some(rejection) = &request.rejection {
        println!("  ! {rejection}");
    }
    println!(
        "Turn {} - {} ({}/{} HP)",
        request.turn, member.name, member.hp, member.max_hp
    );
    for (cursor, slot) in member.moves.iter().enumerate() {
        let name = content
            .move_data(slot.move_id)
            .map_or("?", |data| data.name.as_str());
        let mark = if request.legal_moves.contains(&cursor) { ' ' } else { 'x' };
        println!("  {mark}{cursor}: {name} ({}/{})", slot.pp, slot.max_pp);
    }
    let party = state.roster.party(Side::Player);
    for &index in &request.bench {
        if let Some(bench) = party.members.get(index) {
            println!("  s{index}: {} ({}/{} HP)", bench.name, bench.hp, bench.max_hp);
        }
    }
    println!("> {COMMAND_HELP}");
}

fn show_target_prompt(request: &TargetRequest, state: &BattleState) {
    if let Some(rejection) = &request.rejection {
        println!("  ! {rejection}");
    }
    for (index, target) in request.legal.iter().enumerate() {
        let name = state.combatant(*target).map_or("?", |c| c.name.as_str());
        println!("  {index}: {target} {name}");
    }
    println!("> target number, or b to go back");
}

/// Parses one command line. Anything unreadable returns `None`.
fn parse_command(
    line: &str,
    request: &CommandRequest,
    state: &BattleState,
) -> Option<CommandResponse> {
    let mut words = line.split_whitespace();
    let verb = words.next()?;
    let mut number = || words.next().and_then(|word| word.parse::<usize>().ok());

    let choice = match verb {
        "b" | "back" => return Some(CommandResponse::Cancelled),
        "f" | "fight" => CommandChoice::Fight {
            cursor: number().unwrap_or(0),
        },
        "t" | "transform" => CommandChoice::Transform {
            cursor: number().unwrap_or(0),
        },
        "s" | "switch" => CommandChoice::Switch {
            party_index: number()?,
        },
        "c" | "capture" => {
            let device = number()?;
            let enemy = number().unwrap_or(0);
            let target = state
                .active_on_side(request.combatant.side().opposite())
                .nth(enemy)?;
            CommandChoice::Capture { device, target }
        }
        "r" | "run" => CommandChoice::Flee,
        _ => return None,
    };
    Some(CommandResponse::Selected(choice))
}

fn parse_targets(line: &str, legal: &TargetList) -> Option<Vec<CombatantId>> {
    if matches!(line, "b" | "back") {
        return Some(Vec::new());
    }
    let index = line.parse::<usize>().ok()?;
    legal.get(index).map(|target| vec![*target])
}

/// Prints battle events until the bus closes.
pub async fn narrate(mut events: broadcast::Receiver<Event>) {
    loop {
        match events.recv().await {
            Ok(Event::Battle(event)) => {
                if let Some(line) = describe(&event) {
                    println!("{line}");
                }
            }
            Ok(_) => {}
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                tracing::warn!(skipped, "Narration fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}

fn describe(event: &BattleEvent) -> Option<String> {
    let line = match event {
        BattleEvent::Started {
            formation,
            encounter,
        } => format!("{encounter:?} battle ({formation:?})"),
        BattleEvent::Effect(effect) => match effect {
            BattleEffect::MoveUsed { user, move_id, .. } => format!("{user} used move {move_id}"),
            BattleEffect::Damage {
                target,
                amount,
                remaining,
            } => format!("{target} took {amount} damage ({remaining} left)"),
            BattleEffect::Fainted { combatant } => format!("{combatant} fainted"),
            other => format!("{other:?}"),
        },
        BattleEvent::Decided(outcome) => format!("Battle over: {outcome:?}"),
        BattleEvent::CommandRecorded { .. }
        | BattleEvent::CommandRejected { .. }
        | BattleEvent::CommandCancelled { .. } => return None,
    };
    Some(line)
}

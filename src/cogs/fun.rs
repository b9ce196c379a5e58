use crate::cogs::{Cog, EMBED_COLOR};
use crate::command::respond::ERROR_COLOR;
use crate::command::{Command, CommandRun, Invocation};
use crate::context::BotContext;
use anyhow::Result;
use rand::seq::SliceRandom;
use serenity::all::{CreateEmbed, CreateMessage};
use std::time::Duration;

const RANDOM_FACT_URL: &str = "https://uselessfacts.jsph.pl/api/v2/facts/random";

pub struct Fun;

impl Cog for Fun {
    fn name(&self) -> &'static str {
        "fun"
    }

    fn commands(&self) -> Result<Vec<Command>> {
        Ok(vec![
            Command::new("randomfact", "Get a random fact", "randomfact", RandomFact)
                .cooldown(Duration::from_secs(60)),
            Command::new("coinflip", "Flip a coin", "coinflip", CoinFlip),
        ])
    }
}

struct RandomFact;

#[serenity::async_trait]
impl CommandRun for RandomFact {
    async fn run(&self, ctx: &BotContext<'_>, inv: &Invocation<'_>) -> Result<()> {
        let response = reqwest::get(RANDOM_FACT_URL).await?;

        let embed = if response.status().is_success() {
            let payload: serde_json::Value = response.json().await?;
            let fact = payload["text"].as_str().unwrap_or_default().to_owned();
            CreateEmbed::new().description(fact).color(EMBED_COLOR)
        } else {
            CreateEmbed::new()
                .title("Error!")
                .description("There is something wrong with the API, please try again later")
                .color(ERROR_COLOR)
        };

        inv.msg
            .channel_id
            .send_message(ctx.cache_http, CreateMessage::new().embed(embed))
            .await?;
        Ok(())
    }
}

struct CoinFlip;

#[serenity::async_trait]
impl CommandRun for CoinFlip {
    async fn run(&self, ctx: &BotContext<'_>, inv: &Invocation<'_>) -> Result<()> {
        let outcome = {
            let mut rng = rand::thread_rng();
            ["heads", "tails"].choose(&mut rng).copied().unwrap_or("heads")
        };

        let embed = CreateEmbed::new()
            .description(format!("The coin landed on **{outcome}**!"))
            .color(EMBED_COLOR);
        inv.msg
            .channel_id
            .send_message(ctx.cache_http, CreateMessage::new().embed(embed))
            .await?;
        Ok(())
    }
}

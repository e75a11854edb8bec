use crate::opt::TopicArgs;
use crate::prompt;
use anyhow::Context;
use anyhow::Result;
use srs_engine::card::resolve_weight;
use srs_engine::rand::rng;
use srs_engine::rand::Random;
use srs_engine::sample_card;
use srs_engine::Clock;
use srs_engine::Grade;
use srs_engine::Scheduler;
use srs_engine::SchedulingResult;
use srs_engine::Topic;
use srs_engine::Weighted;
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;
use tracing::info;

pub struct App<C: Clock> {
    clock: C,
}

/// A card known only by its position and weight.
#[derive(Debug)]
struct IndexedCard {
    index: usize,
    weight: f64,
}

impl Weighted for IndexedCard {
    fn intrinsic_weight(&self) -> Option<f64> {
        Some(self.weight)
    }
}

impl<C: Clock> App<C> {
    pub fn new(clock: C) -> Self {
        Self { clock }
    }

    pub fn sample(&self, weights: &[f64], draws: u32, seed: Option<u64>) -> Result<()> {
        let counts = tally(&mut rng(seed), weights, draws)?;
        let shares = expected_shares(weights)?;

        println!("{draws} draws");

        let rows = weights.iter().zip(counts).zip(shares);

        for (i, ((weight, count), expected)) in rows.enumerate() {
            let observed = f64::from(count) / f64::from(draws.max(1)) * 100.0;

            println!(
                "#{} weight {weight}: {count} ({observed:.1}%, expected {expected:.1}%)",
                i + 1
            );
        }

        Ok(())
    }

    pub fn review(&self, grade: Grade, weight: f64, topic: TopicArgs) -> Result<()> {
        let result = self.reviewed(grade, weight, &topic)?;

        println!("Reviewed as {grade} with weight {weight}");
        print_result(&result)
    }

    fn reviewed(&self, grade: Grade, weight: f64, topic: &TopicArgs) -> Result<SchedulingResult> {
        let topic = start_topic(topic, self.clock.now());

        Scheduler::new(&self.clock)
            .review(&topic, grade, weight)
            .context("failed to process review")
    }

    pub fn simulate(&self, grades: &[Grade], weight: f64, topic: TopicArgs) -> Result<()> {
        let topic = start_topic(&topic, self.clock.now());
        let results = replay(topic, grades, weight)?;

        println!("  # grade  stability  difficulty  interval  next review");

        for (i, (grade, result)) in grades.iter().zip(results).enumerate() {
            println!(
                "{:>3} {grade:<6} {:>9.1}h {:>11.2} {:>8.1}h  {}",
                i + 1,
                result.stability,
                result.difficulty,
                interval_hours(&result),
                result.next_review.format(&Rfc3339)?,
            );
        }

        Ok(())
    }

    pub fn drill(&self, weights: &[f64], rounds: u32, seed: Option<u64>) -> Result<()> {
        let cards = indexed(weights);

        let mut rng = rng(seed);
        let scheduler = Scheduler::new(&self.clock);
        let mut topic = Topic::new(self.clock.now());
        let mut num_reviewed = 0;

        println!("{} cards in topic, q to stop\n", cards.len());

        for round in 1..=rounds {
            let card = sample_card(&mut rng, &cards)?.context("topic has no cards")?;

            println!("Round {round}: card #{} (weight {})", card.index + 1, card.weight);

            let Some(grade) = prompt::grade("How well did you recall it?")? else {
                break;
            };

            let result = scheduler.review(&topic, grade, card.weight)?;
            topic = topic.apply(&result);
            num_reviewed += 1;

            println!(
                "stability {:.1}h, difficulty {:.2}, next review in {:.1}h\n",
                result.stability,
                result.difficulty,
                interval_hours(&result),
            );
        }

        info!(num_reviewed, "drill finished");
        println!("Reviewed {num_reviewed} cards");

        if topic.last_reviewed.is_some() {
            println!(
                "Topic is due again at {}",
                topic.next_review.format(&Rfc3339)?
            );
        }

        Ok(())
    }
}

fn start_topic(args: &TopicArgs, now: OffsetDateTime) -> Topic {
    Topic {
        stability: args.stability,
        difficulty: args.difficulty,
        ..Topic::new(now)
    }
}

/// How many times each weight was picked over `draws` samples.
fn tally<R: Random>(rng: &mut R, weights: &[f64], draws: u32) -> Result<Vec<u32>> {
    let cards = indexed(weights);
    let mut counts = vec![0; cards.len()];

    for _ in 0..draws {
        if let Some(card) = sample_card(rng, &cards)? {
            counts[card.index] += 1;
        }
    }

    Ok(counts)
}

/// Percentage of draws each weight should get, using the sampler's weight rules.
fn expected_shares(weights: &[f64]) -> Result<Vec<f64>> {
    let resolved = weights
        .iter()
        .map(|&w| resolve_weight(Some(w)))
        .collect::<srs_engine::Result<Vec<_>>>()?;

    // Scaled by the largest so the sum cannot overflow
    let max = resolved.iter().copied().fold(0.0, f64::max);
    let total: f64 = resolved.iter().map(|w| w / max).sum();

    Ok(resolved.iter().map(|w| w / max / total * 100.0).collect())
}

fn indexed(weights: &[f64]) -> Vec<IndexedCard> {
    weights
        .iter()
        .enumerate()
        .map(|(index, &weight)| IndexedCard { index, weight })
        .collect()
}

/// Applies each grade when the topic next comes due.
fn replay(mut topic: Topic, grades: &[Grade], weight: f64) -> Result<Vec<SchedulingResult>> {
    let mut results = Vec::with_capacity(grades.len());

    for &grade in grades {
        let result = srs_engine::process_review(&topic, grade, weight, topic.next_review)?;
        topic = topic.apply(&result);
        results.push(result);
    }

    Ok(results)
}

fn interval_hours(result: &SchedulingResult) -> f64 {
    (result.next_review - result.last_reviewed).as_seconds_f64() / 3600.0
}

fn print_result(result: &SchedulingResult) -> Result<()> {
    println!("Stability: {:.1}h", result.stability);
    println!("Difficulty: {:.2}", result.difficulty);
    println!("Next review in {:.1}h", interval_hours(result));
    println!("Next review at {}", result.next_review.format(&Rfc3339)?);

    Ok(())
}

//! Pipeline simulation
//!
//! Wires the full in-process stack (pricing -> algo streaming, market data
//! -> algo execution), registers logging sinks at the egress boundary, and
//! drives it with bounded synthetic quotes and five-level order books in US
//! Treasury price conventions (99-100 handle, 1/32 ticks, 1/256 fractions).

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::sync::Arc;
use tracing::{debug, info};

use fixed_income_pipeline::{
    AlgoExecutionEngine, AlgoStreamingEngine, Bond, ExecutionOrder, MarketDataService, Order,
    OrderBook, PipelineMetrics, Price, PriceStream, PricingService, ReferenceData, Service, Side,
};

const QUOTES_PER_PRODUCT: usize = 1_000;
const BOOKS_PER_PRODUCT: usize = 1_000;
const BOOK_DEPTH: usize = 5;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    info!("Starting fixed-income pipeline simulation...");

    let reference = ReferenceData::us_treasury();
    let metrics = Arc::new(PipelineMetrics::new());

    // Quote leg: pricing service feeds the algo streaming engine, which
    // publishes two-way streams to an egress sink.
    let pricing: Arc<PricingService<Bond>> = Arc::new(PricingService::new());
    let streaming: Arc<AlgoStreamingEngine<Bond>> = Arc::new(AlgoStreamingEngine::new());
    let streaming_clone = Arc::clone(&streaming);
    pricing.add_listener(Arc::new(move |quote: &Price<Bond>| {
        streaming_clone.publish_price(quote);
    }));

    let metrics_clone = Arc::clone(&metrics);
    streaming.add_listener(Arc::new(move |stream: &PriceStream<Bond>| {
        metrics_clone.increment_streams_published();
        debug!(
            product = stream.product_id(),
            bid = stream.bid_order().price,
            offer = stream.offer_order().price,
            visible = stream.bid_order().visible_quantity,
            "stream published"
        );
    }));

    // Order-book leg: market data feeds the algo execution engine, which
    // emits crossing orders to an egress sink.
    let market_data: Arc<MarketDataService<Bond>> = Arc::new(MarketDataService::new());
    let execution: Arc<AlgoExecutionEngine<Bond>> = Arc::new(AlgoExecutionEngine::new());
    let execution_clone = Arc::clone(&execution);
    market_data.add_listener(Arc::new(move |book: &OrderBook<Bond>| {
        execution_clone.on_order_book(book);
    }));

    let metrics_clone = Arc::clone(&metrics);
    execution.add_listener(Arc::new(move |order: &ExecutionOrder<Bond>| {
        metrics_clone.increment_orders_generated();
        debug!(
            product = order.product_id(),
            order_id = order.order_id(),
            side = %order.side(),
            price = order.price(),
            "execution order emitted"
        );
    }));

    let mut rng = StdRng::seed_from_u64(20240831);
    for product_id in reference.product_ids() {
        let bond = reference.bond(&product_id)?;

        for _ in 0..QUOTES_PER_PRODUCT {
            pricing.on_message(synthetic_quote(&mut rng, bond.clone()));
            metrics.increment_quotes_processed();
        }

        for _ in 0..BOOKS_PER_PRODUCT {
            market_data.on_message(synthetic_book(&mut rng, bond.clone()));
            metrics.increment_books_processed();
        }

        info!(product = %bond, "finished synthetic feed");
    }

    let snapshot = metrics.snapshot();
    info!(
        quotes = snapshot.quotes_processed,
        streams = snapshot.streams_published,
        books = snapshot.books_processed,
        orders = snapshot.orders_generated,
        "pipeline run complete"
    );

    Ok(())
}

/// A random US Treasury price: 99 or 100 handle plus 1/32 ticks plus 1/256
/// fractions.
fn tick_price(rng: &mut StdRng) -> f64 {
    let handle = rng.gen_range(99..=100) as f64;
    let ticks = rng.gen_range(0..32) as f64 / 32.0;
    let fraction = rng.gen_range(0..8) as f64 / 256.0;
    handle + ticks + fraction
}

fn synthetic_quote(rng: &mut StdRng, bond: Bond) -> Price<Bond> {
    // Spread alternates between one and two 128ths, as the upstream quote
    // feed does.
    let spread = if rng.gen_bool(0.5) { 1.0 / 128.0 } else { 1.0 / 64.0 };
    Price::new(bond, tick_price(rng), spread)
}

fn synthetic_book(rng: &mut StdRng, bond: Bond) -> OrderBook<Bond> {
    let mut bids = Vec::with_capacity(BOOK_DEPTH);
    let mut offers = Vec::with_capacity(BOOK_DEPTH);

    for _ in 0..BOOK_DEPTH {
        let first = tick_price(rng);
        let second = tick_price(rng);
        let (bid, offer) = if first <= second {
            (first, second)
        } else {
            (second, first)
        };
        let quantity = 1_000_000 * rng.gen_range(1..=5);
        bids.push(Order::new(bid, quantity, Side::Bid));
        offers.push(Order::new(offer, quantity, Side::Offer));
    }

    OrderBook::new(bond, bids, offers)
}

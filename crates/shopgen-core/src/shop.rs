//! Full shop dataset: customers, products, carts built from the order
//! simulation, cart items, support agents and support requests.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use fake::faker::internet::en::SafeEmail;
use fake::faker::lorem::en::{Sentence, Word};
use fake::faker::name::en::Name;
use fake::faker::phone_number::en::PhoneNumber;
use fake::Fake;
use rand::seq::index;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{Config, GenerationConfig};
use crate::daterange::{Clock, DateRange};
use crate::error::{Result, ShopGenError};
use crate::random::RngSource;
use crate::simulator::OrderSimulator;
use crate::types::Table;

pub const MIN_PRICE: f64 = 5.0;
pub const MAX_PRICE: f64 = 500.0;
pub const MAX_ITEMS_PER_CART: u32 = 5;
pub const MAX_QUANTITY: u32 = 5;

/// Attempts at drawing a fresh agent email before falling back to a
/// numbered address.
const UNIQUE_EMAIL_ATTEMPTS: usize = 32;

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Customer {
    pub id: u64,
    pub name: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub description: Option<String>,
    pub price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingCart {
    pub id: u64,
    pub customer_id: u64,
    pub created_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingCartItem {
    pub id: u64,
    pub cart_id: u64,
    pub product_id: u64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportAgent {
    pub id: u64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SupportRequest {
    pub id: u64,
    pub customer_id: u64,
    pub agent_id: u64,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShopDataset {
    pub customers: Vec<Customer>,
    pub products: Vec<Product>,
    pub carts: Vec<ShoppingCart>,
    pub items: Vec<ShoppingCartItem>,
    pub agents: Vec<SupportAgent>,
    pub requests: Vec<SupportRequest>,
}

impl ShopDataset {
    pub fn count(&self, table: Table) -> usize {
        match table {
            Table::Customers => self.customers.len(),
            Table::Products => self.products.len(),
            Table::ShoppingCarts => self.carts.len(),
            Table::ShoppingCartItems => self.items.len(),
            Table::SupportAgents => self.agents.len(),
            Table::SupportRequests => self.requests.len(),
        }
    }
}

/// 1-based id for the record at position `idx`.
fn seq_id(idx: usize) -> u64 {
    idx as u64 + 1
}

// ---------------------------------------------------------------------------
// ShopGenerator
// ---------------------------------------------------------------------------

pub struct ShopGenerator {
    simulator: OrderSimulator,
    generation: GenerationConfig,
}

impl ShopGenerator {
    pub fn new(config: &Config) -> Result<Self> {
        Ok(Self {
            simulator: OrderSimulator::new(config.simulation.policy())?,
            generation: config.generation.clone(),
        })
    }

    /// Build the whole dataset. Carts cover the configured number of days
    /// ending the day before `clock.today()`.
    pub fn generate<C, R>(&self, clock: &C, source: &mut RngSource<R>) -> Result<ShopDataset>
    where
        C: Clock + ?Sized,
        R: Rng,
    {
        let now = clock.now();
        let range = DateRange::last_days(clock.today(), self.generation.days)?;

        let customers = fake_customers(self.generation.customers, source.rng_mut());
        info!(count = customers.len(), "generated customers");

        let products = fake_products(self.generation.products, source.rng_mut());
        info!(count = products.len(), "generated products");

        let carts = self.simulate_carts(range, customers.len(), source)?;
        info!(
            count = carts.len(),
            from = %range.start(),
            to = %range.end(),
            "generated shopping carts"
        );

        let items = fake_cart_items(&carts, products.len(), source.rng_mut());
        info!(count = items.len(), "generated shopping cart items");

        let agents = fake_agents(self.generation.agents, source.rng_mut());
        info!(count = agents.len(), "generated support agents");

        let requests = fake_requests(
            self.generation.support_requests,
            customers.len(),
            agents.len(),
            now,
            source.rng_mut(),
        );
        info!(count = requests.len(), "generated support requests");

        Ok(ShopDataset {
            customers,
            products,
            carts,
            items,
            agents,
            requests,
        })
    }

    /// One cart per simulated order; each day's orders go to distinct
    /// customers.
    fn simulate_carts<R: Rng>(
        &self,
        range: DateRange,
        customer_count: usize,
        source: &mut RngSource<R>,
    ) -> Result<Vec<ShoppingCart>> {
        let mut carts = Vec::new();
        for date in range.days() {
            let orders = self.simulator.simulate_day(date, source)?;
            if orders.len() > customer_count {
                return Err(ShopGenError::InsufficientCustomers {
                    needed: orders.len(),
                    available: customer_count,
                });
            }
            let picked = index::sample(source.rng_mut(), customer_count, orders.len());
            for (order, customer_idx) in orders.into_iter().zip(picked) {
                carts.push(ShoppingCart {
                    id: seq_id(carts.len()),
                    customer_id: seq_id(customer_idx),
                    created_at: order.created_at,
                    completed_at: order.completed_at,
                });
            }
        }
        Ok(carts)
    }
}

// ---------------------------------------------------------------------------
// Fakes
// ---------------------------------------------------------------------------

fn fake_customers<R: Rng>(n: usize, rng: &mut R) -> Vec<Customer> {
    (0..n)
        .map(|i| Customer {
            id: seq_id(i),
            name: Name().fake_with_rng(rng),
            email: SafeEmail().fake_with_rng(rng),
            phone: PhoneNumber().fake_with_rng(rng),
        })
        .collect()
}

/// Uniform price in `[MIN_PRICE, MAX_PRICE]`, rounded to cents.
pub fn fake_price<R: Rng>(rng: &mut R) -> f64 {
    (rng.gen_range(MIN_PRICE..=MAX_PRICE) * 100.0).round() / 100.0
}

fn fake_products<R: Rng>(n: usize, rng: &mut R) -> Vec<Product> {
    (0..n)
        .map(|i| Product {
            id: seq_id(i),
            name: Word().fake_with_rng(rng),
            description: Some(Sentence(4..10).fake_with_rng(rng)),
            price: fake_price(rng),
        })
        .collect()
}

fn fake_cart_items<R: Rng>(
    carts: &[ShoppingCart],
    product_count: usize,
    rng: &mut R,
) -> Vec<ShoppingCartItem> {
    let mut items = Vec::new();
    if product_count == 0 {
        return items;
    }
    for cart in carts {
        let n = rng.gen_range(1..=MAX_ITEMS_PER_CART);
        for _ in 0..n {
            items.push(ShoppingCartItem {
                id: seq_id(items.len()),
                cart_id: cart.id,
                product_id: seq_id(rng.gen_range(0..product_count)),
                quantity: rng.gen_range(1..=MAX_QUANTITY),
            });
        }
    }
    items
}

fn fake_agents<R: Rng>(n: usize, rng: &mut R) -> Vec<SupportAgent> {
    let mut seen = HashSet::with_capacity(n);
    (0..n)
        .map(|i| {
            let id = seq_id(i);
            let email = unique_email(id, &mut seen, rng);
            SupportAgent {
                id,
                name: Name().fake_with_rng(rng),
                email,
            }
        })
        .collect()
}

fn unique_email<R: Rng>(id: u64, seen: &mut HashSet<String>, rng: &mut R) -> String {
    for _ in 0..UNIQUE_EMAIL_ATTEMPTS {
        let email: String = SafeEmail().fake_with_rng(rng);
        if seen.insert(email.clone()) {
            return email;
        }
    }
    let email = format!("agent{id}@example.com");
    seen.insert(email.clone());
    email
}

fn fake_requests<R: Rng>(
    n: usize,
    customer_count: usize,
    agent_count: usize,
    created_at: DateTime<Utc>,
    rng: &mut R,
) -> Vec<SupportRequest> {
    if customer_count == 0 || agent_count == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| SupportRequest {
            id: seq_id(i),
            customer_id: seq_id(rng.gen_range(0..customer_count)),
            agent_id: seq_id(rng.gen_range(0..agent_count)),
            message: Sentence(4..10).fake_with_rng(rng),
            created_at,
        })
        .collect()
}

//! Response rendering.
//!
//! Each topic gets a structured explanation: problem identification,
//! step-by-step solution, key takeaways. For elasticity problems with
//! enough numbers in the text, a computed result section is appended;
//! anything that prevents the computation (too few numbers, zero
//! denominators) silently falls back to the plain template. Rendering
//! never fails.

use crate::formulas;
use crate::topic::Topic;
use regex_lite::Regex;

pub struct Responder {
    number_pattern: Regex,
}

impl Default for Responder {
    fn default() -> Self {
        Self::new()
    }
}

impl Responder {
    pub fn new() -> Self {
        Self {
            // Same shape the original extraction used; ".5" is not matched.
            number_pattern: Regex::new(r"-?\d+\.?\d*").expect("valid number pattern"),
        }
    }

    /// Render the explanation for a classified problem.
    pub fn respond(&self, problem: &str, topic: Topic) -> String {
        match topic {
            Topic::SupplyDemand => supply_demand(),
            Topic::Elasticity => self.elasticity(problem),
            Topic::MarketEquilibrium => market_equilibrium(),
            Topic::Surplus => surplus(),
            Topic::Gdp => gdp(),
            Topic::MacroIndicators => macro_indicators(),
            Topic::MarketStructure => market_structure(),
            Topic::General => general(),
        }
    }

    fn elasticity(&self, problem: &str) -> String {
        let mut solution = format!(
            "\
**ELASTICITY ANALYSIS**

**Problem Identification:**
This is an elasticity problem. Elasticity measures the responsiveness of one variable to changes in another.

**Key Formulas:**
- {ped}
- {pes}

**Step-by-Step Solution:**

1. **Calculate Percentage Changes:**
   - % Change in Quantity = ((Q2 - Q1) / Q1) × 100
   - % Change in Price = ((P2 - P1) / P1) × 100

2. **Calculate Elasticity:**
   - PED = % Change in Quantity Demanded / % Change in Price
   - Use the absolute value for interpretation

3. **Interpret Results:**
   - |PED| > 1: Elastic (quantity responds strongly to price)
   - |PED| < 1: Inelastic (quantity responds weakly to price)
   - |PED| = 1: Unit elastic (proportional response)

**Key Takeaways:**
- More substitutes, luxuries, and longer time horizons all make demand more elastic
- Elastic demand: price cuts raise total revenue; inelastic demand: price rises raise it
- Gasoline and salt are classic inelastic goods; restaurant meals are elastic
",
            ped = formulas::ELASTICITY_DEMAND,
            pes = formulas::ELASTICITY_SUPPLY,
        );

        if let Some(calculation) = self.elasticity_calculation(problem) {
            solution.push_str(&calculation);
        }

        solution
    }

    /// Attempt the numeric computation. Returns `None` on any shortfall so
    /// the caller falls back to the plain template.
    fn elasticity_calculation(&self, problem: &str) -> Option<String> {
        let numbers = self.extract_numbers(problem);
        if numbers.len() < 4 {
            return None;
        }

        // Reading order from the original: Q1, Q2, P1, P2.
        let (q1, q2, p1, p2) = (numbers[0], numbers[1], numbers[2], numbers[3]);
        if q1 == 0.0 || p1 == 0.0 {
            return None;
        }

        let pct_change_q = ((q2 - q1) / q1) * 100.0;
        let pct_change_p = ((p2 - p1) / p1) * 100.0;
        if pct_change_p == 0.0 {
            return None;
        }

        let elasticity = (pct_change_q / pct_change_p).abs();
        let interpretation = if elasticity > 1.0 {
            "Elastic"
        } else if elasticity < 1.0 {
            "Inelastic"
        } else {
            "Unit Elastic"
        };

        Some(format!(
            "
**Numerical Calculation:**
- Initial Quantity: {q1}, New Quantity: {q2}
- Initial Price: {p1}, New Price: {p2}
- % Change in Quantity: {pct_change_q:.2}%
- % Change in Price: {pct_change_p:.2}%
- Price Elasticity: |{pct_change_q:.2}/{pct_change_p:.2}| = {elasticity:.2}
- Interpretation: {interpretation}
"
        ))
    }

    fn extract_numbers(&self, text: &str) -> Vec<f64> {
        self.number_pattern
            .find_iter(text)
            .filter_map(|m| m.as_str().parse().ok())
            .collect()
    }
}

fn supply_demand() -> String {
    "\
**SUPPLY AND DEMAND ANALYSIS**

**Problem Identification:**
This appears to be a supply and demand problem. Let me analyze the key components.

**Step-by-Step Solution:**

1. **Identify the Market Factors:**
   - What good or service is being analyzed, and what might shift supply or demand?
   - Are we looking at movements along curves or shifts of curves?

2. **Demand Analysis:**
   - Demand Law: as price rises, quantity demanded falls (ceteris paribus)
   - Demand shifters: income, tastes, prices of substitutes/complements, expectations, population

3. **Supply Analysis:**
   - Supply Law: as price rises, quantity supplied rises (ceteris paribus)
   - Supply shifters: input costs, technology, expectations, number of sellers, government policies

4. **Market Effects:**
   - Demand increase: price up, quantity up; demand decrease: both down
   - Supply increase: price down, quantity up; supply decrease: price up, quantity down

**Key Takeaways:**
- Distinguish a change in demand/supply (curve shift) from a change in quantity demanded/supplied (movement along the curve)
- Shortages occur below the equilibrium price, surpluses above it
- Weather, income changes, and new technology are common real-world shifters
"
    .to_string()
}

fn market_equilibrium() -> String {
    "\
**MARKET EQUILIBRIUM ANALYSIS**

**Problem Identification:**
This involves finding where supply and demand curves intersect to determine equilibrium price and quantity.

**Step-by-Step Solution:**

1. **Set Up Equations:**
   - Demand: Qd = a - bP (downward sloping); Supply: Qs = c + dP (upward sloping)

2. **Find Equilibrium:**
   - At equilibrium Qd = Qs, so a - bP = c + dP
   - Equilibrium price: Pe = (a - c) / (b + d); quantity: Qe = a - b × Pe

3. **Verify:**
   - Substitute Pe back into both equations; both must give the same Qe

4. **Analyze Market Conditions:**
   - Price above Pe: surplus (Qs > Qd); price below Pe: shortage (Qd > Qs)

**Key Takeaways:**
- Market forces push price toward equilibrium
- Demand increase raises both Pe and Qe; supply increase lowers Pe and raises Qe
- Equilibrium explains how competitive markets set prices and adjust to change
"
    .to_string()
}

fn surplus() -> String {
    format!(
        "\
**CONSUMER AND PRODUCER SURPLUS ANALYSIS**

**Problem Identification:**
This involves calculating the welfare gains from trade in a market.

**Key Formulas:**
- {cs}
- {ps}

**Step-by-Step Solution:**

1. **Consumer Surplus:**
   - Area between the demand curve and the market price
   - CS = 0.5 × Qe × (Pmax - Pe), where Pmax is the demand curve's price intercept

2. **Producer Surplus:**
   - Area between the supply curve and the market price
   - PS = 0.5 × Qe × (Pe - Pmin), where Pmin is the supply curve's price intercept

3. **Total Economic Surplus:**
   - Total surplus = CS + PS, maximized at the competitive equilibrium
   - Price controls reduce total surplus and create deadweight loss

**Key Takeaways:**
- A price ceiling below equilibrium shrinks both CS and PS
- A price floor above equilibrium transfers surplus from consumers to producers
- Deadweight loss is the total surplus lost to market inefficiency
",
        cs = formulas::CONSUMER_SURPLUS,
        ps = formulas::PRODUCER_SURPLUS,
    )
}

fn gdp() -> String {
    format!(
        "\
**GDP ANALYSIS**

**Problem Identification:**
This involves calculating or analyzing Gross Domestic Product and economic growth.

**Key Formulas:**
- {nominal}
- {real}

**Step-by-Step Solution:**

1. **GDP Calculation Methods:**
   - Expenditure approach: GDP = C + I + G + (X - M)
   - Income approach: sum of all incomes earned in production
   - Production approach: sum of value added across industries

2. **Nominal vs Real GDP:**
   - Nominal uses current prices; real uses base-year prices
   - GDP deflator = (Nominal GDP / Real GDP) × 100

3. **Growth:**
   - Growth rate = ((GDP_new - GDP_old) / GDP_old) × 100
   - Per-capita GDP = GDP / population

**Key Takeaways:**
- Consumption is usually the largest component; investment the most volatile
- Two quarters of declining GDP signal a recession
- GDP omits income distribution, household production, and environmental costs
",
        nominal = formulas::GDP_NOMINAL,
        real = formulas::GDP_REAL,
    )
}

fn macro_indicators() -> String {
    format!(
        "\
**MACROECONOMIC INDICATORS ANALYSIS**

**Problem Identification:**
This involves analyzing inflation, unemployment, or related macroeconomic indicators.

**Key Formulas:**
- {inflation}
- {unemployment}

**Step-by-Step Solution:**

1. **Inflation Analysis:**
   - CPI = cost of the market basket this year / cost in the base year × 100
   - Types: demand-pull, cost-push, built-in

2. **Unemployment Analysis:**
   - Labor force = employed + unemployed actively seeking work
   - Types: frictional, structural, cyclical, seasonal

3. **The Tradeoff:**
   - Phillips curve: a short-run tradeoff between inflation and unemployment
   - Long run: no permanent tradeoff (natural rate hypothesis)

**Key Takeaways:**
- Inflation favors debtors with fixed-rate loans and hurts savers and fixed incomes
- Expansionary policy lowers unemployment but risks inflation; contractionary does the opposite
- Okun's Law: a 1% rise in unemployment costs roughly 2% of GDP
",
        inflation = formulas::INFLATION_RATE,
        unemployment = formulas::UNEMPLOYMENT_RATE,
    )
}

fn market_structure() -> String {
    "\
**MARKET STRUCTURE ANALYSIS**

**Problem Identification:**
This involves analyzing the characteristics and behavior of different market structures.

**Step-by-Step Solution:**

1. **Perfect Competition:**
   - Many sellers, identical products, easy entry/exit; firms are price takers (P = MR = MC)

2. **Monopolistic Competition:**
   - Many sellers, differentiated products; some price-setting power (P > MC), excess capacity

3. **Oligopoly:**
   - Few sellers, high entry barriers, strategic interdependence; potential for collusion

4. **Monopoly:**
   - Single seller, blocked entry; price maker (P > MR = MC), deadweight loss

**Comparison:**
- Price control rises from none (perfect competition) to complete (monopoly)
- Consumer surplus shrinks and deadweight loss grows as market power increases

**Key Takeaways:**
- Antitrust law targets monopolies and colluding oligopolies
- Natural monopolies are regulated rather than broken up
- Patents trade short-run market power for long-run innovation
"
    .to_string()
}

fn general() -> String {
    "\
**GENERAL ECONOMICS GUIDANCE**

This looks like a general economics question. Here is a structured approach:

**Key Economic Principles:**

1. **Scarcity and Choice:** every choice has an opportunity cost — the next best alternative
2. **Supply and Demand:** the foundation of market analysis
3. **Marginal Analysis:** compare marginal benefit to marginal cost
4. **Efficiency:** allocative (P = MC) and productive (minimum-cost production)

**Problem-Solving Steps:**
1. Identify the economic concepts involved
2. Define the key terms and relationships
3. Apply the relevant model or formula
4. Interpret the result in economic context

**Key Takeaways:**
- Draw graphs to visualize concepts and practice with numerical problems
- Microeconomics covers individual markets; macroeconomics the economy as a whole
- Provide more specific details for a step-by-step numeric solution
"
    .to_string()
}

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};

use crate::application::{AgencyService, LocalInsight, RangeReport, TourSummary};
use crate::domain::{
    Cents, DateRange, ExpenseCategory, NewGuest, NewTour, PaymentStatus, Tour, format_cents,
    parse_cents,
};

/// tourledger - travel agency back office
#[derive(Parser)]
#[command(name = "tourledger")]
#[command(about = "Track tours, guest payments and expenses, and report on profit")]
#[command(version)]
pub struct Cli {
    /// Database file path
    #[arg(short, long, env = "TOURLEDGER_DB", default_value = "tourledger.db")]
    pub database: String,

    /// Enable debug logging on stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new database
    Init,

    /// Register a new agency account and log in
    Register {
        /// Display name
        name: String,

        /// Email address (used to log in)
        email: String,

        /// Contact phone number
        #[arg(long)]
        phone: Option<String>,
    },

    /// Log in with an existing account
    Login {
        /// Email address
        email: String,
    },

    /// Log out
    Logout,

    /// Show the logged-in account
    Whoami,

    /// Tour management commands
    #[command(subcommand)]
    Tour(TourCommands),

    /// Guest booking commands
    #[command(subcommand)]
    Guest(GuestCommands),

    /// Expense commands
    #[command(subcommand)]
    Expense(ExpenseCommands),

    /// Show totals across all your tours
    Stats {
        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Income and profit for tours within a date range
    Report {
        /// First tour date to include (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Last tour date to include (YYYY-MM-DD)
        #[arg(long)]
        to: Option<String>,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum TourCommands {
    /// Create a new tour
    Create {
        /// Tour name
        name: String,

        /// Tour date (YYYY-MM-DD)
        #[arg(long)]
        date: String,

        /// Price per seat (e.g., "1500" or "1500.00")
        #[arg(short, long)]
        price: String,

        /// Host or guide leading the tour
        #[arg(long, default_value = "")]
        host: String,

        /// Seat capacity
        #[arg(short, long, default_value = "20")]
        seats: u32,

        /// Description
        #[arg(short, long, default_value = "")]
        description: String,
    },

    /// List your tours
    List {
        /// Only tours whose name or host contains this text
        #[arg(short, long)]
        search: Option<String>,
    },

    /// Show a tour's financial summary and guest dues
    Show {
        /// Tour ID
        id: String,

        /// Output format: table, json
        #[arg(long, default_value = "table")]
        format: String,
    },

    /// Delete a tour with all its guests and expenses
    Delete {
        /// Tour ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum GuestCommands {
    /// Book a guest on a tour
    Add {
        /// Tour ID
        tour: String,

        /// Guest name
        name: String,

        /// Amount paid so far
        #[arg(short, long, default_value = "0")]
        paid: String,

        /// Mobile number
        #[arg(short, long, default_value = "")]
        mobile: String,

        /// Seat number
        #[arg(long, default_value = "")]
        seat: String,

        /// Payment status: paid, partial, unpaid
        #[arg(long, default_value = "unpaid")]
        status: String,
    },

    /// List guests on a tour
    List {
        /// Tour ID
        tour: String,
    },

    /// Delete a guest
    Delete {
        /// Guest ID
        id: String,
    },
}

#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Record an expense on a tour
    Add {
        /// Tour ID
        tour: String,

        /// Category: transport, hotel, food, guide, other
        category: String,

        /// Amount (e.g., "500" or "500.00")
        amount: String,

        /// Note
        #[arg(short, long)]
        note: Option<String>,
    },

    /// List expenses on a tour
    List {
        /// Tour ID
        tour: String,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: String,
    },
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        if matches!(self.command, Commands::Init) {
            AgencyService::init(&self.database).await?;
            println!("Database initialized: {}", self.database);
            return Ok(());
        }

        let service = AgencyService::connect(&self.database)
            .await
            .with_context(|| format!("Cannot open '{}'. Run `init` first", self.database))?;

        match self.command {
            Commands::Init => {}

            Commands::Register { name, email, phone } => {
                let user = service.register_user(name, email, phone).await?;
                println!("Registered and logged in as {} <{}>", user.name, user.email);
            }

            Commands::Login { email } => {
                let user = service.login(&email).await?;
                println!("Logged in as {} <{}>", user.name, user.email);
            }

            Commands::Logout => {
                service.logout().await?;
                println!("Logged out");
            }

            Commands::Whoami => match service.current_user().await? {
                Some(user) => {
                    println!("{} <{}>", user.name, user.email);
                    println!("  ID:   {}", user.id);
                    println!("  Role: {}", user.role);
                }
                None => println!("Not logged in"),
            },

            Commands::Tour(cmd) => run_tour_command(&service, cmd).await?,

            Commands::Guest(cmd) => run_guest_command(&service, cmd).await?,

            Commands::Expense(cmd) => run_expense_command(&service, cmd).await?,

            Commands::Stats { format } => {
                let user = service.require_user().await?;
                let dashboard = service.dashboard(&user.id, Some(&LocalInsight)).await?;

                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&dashboard)?),
                    _ => {
                        let stats = &dashboard.stats;
                        println!("Tours:          {:>15}", stats.total_tours);
                        println!("Guests:         {:>15}", stats.total_guests);
                        println!("Total Income:   {:>15}", format_cents(stats.total_income));
                        println!("Total Expenses: {:>15}", format_cents(stats.total_expenses));
                        println!("{}", "-".repeat(31));
                        println!("Net Profit:     {:>15}", format_cents(stats.net_profit));
                        println!();
                        println!("{}", dashboard.insight);
                    }
                }
            }

            Commands::Report { from, to, format } => {
                let user = service.require_user().await?;
                let range = DateRange::new(parse_optional_date(from)?, parse_optional_date(to)?);
                let report = service.range_report(&user.id, range).await?;

                match format.as_str() {
                    "json" => println!("{}", serde_json::to_string_pretty(&report)?),
                    _ => print_range_report(&report),
                }
            }
        }

        Ok(())
    }
}

async fn run_tour_command(service: &AgencyService, cmd: TourCommands) -> Result<()> {
    let user = service.require_user().await?;

    match cmd {
        TourCommands::Create {
            name,
            date,
            price,
            host,
            seats,
            description,
        } => {
            let tour_date = parse_date(&date)?;
            let price_per_seat =
                parse_cents(&price).context("Invalid price format. Use '1500.00' or '1500'")?;

            let draft = NewTour::new(name, tour_date, price_per_seat)
                .with_host(host)
                .with_seats(seats)
                .with_description(description);
            let tour = service.create_tour(&user.id, draft).await?;

            println!(
                "Created tour: {} on {} ({})",
                tour.tour_name, tour.tour_date, tour.id
            );
        }

        TourCommands::List { search } => {
            let tours = match search {
                Some(term) => service.search_tours(&user.id, &term).await?,
                None => service.list_tours(&user.id).await?,
            };
            print_tours(&tours);
        }

        TourCommands::Show { id, format } => {
            let summary = service.tour_summary(&user.id, &id).await?;
            match format.as_str() {
                "json" => println!("{}", serde_json::to_string_pretty(&summary)?),
                _ => print_tour_summary(&summary),
            }
        }

        TourCommands::Delete { id } => {
            let removed = service.delete_tour(&user.id, &id).await?;
            println!(
                "Deleted tour: {} ({} guest(s), {} expense(s) removed)",
                removed.tour.tour_name, removed.guests_removed, removed.expenses_removed
            );
        }
    }

    Ok(())
}

async fn run_guest_command(service: &AgencyService, cmd: GuestCommands) -> Result<()> {
    let user = service.require_user().await?;

    match cmd {
        GuestCommands::Add {
            tour,
            name,
            paid,
            mobile,
            seat,
            status,
        } => {
            let paid_amount =
                parse_cents(&paid).context("Invalid amount format. Use '400.00' or '400'")?;
            let payment_status: PaymentStatus = status.parse().map_err(|e| {
                anyhow::anyhow!("{}. Valid statuses: paid, partial, unpaid", e)
            })?;

            let draft = NewGuest::new(name, paid_amount)
                .with_mobile(mobile)
                .with_seat(seat)
                .with_status(payment_status);
            let guest = service.add_guest(&user.id, &tour, draft).await?;

            println!(
                "Added guest: {} paid {} ({})",
                guest.guest_name,
                format_cents(guest.paid_amount),
                guest.id
            );
        }

        GuestCommands::List { tour } => {
            let guests = service.list_guests(&user.id, &tour).await?;
            if guests.is_empty() {
                println!("No guests booked.");
            } else {
                println!(
                    "{:<38} {:<20} {:<14} {:<6} {:>12} {:<8}",
                    "ID", "NAME", "MOBILE", "SEAT", "PAID", "STATUS"
                );
                println!("{}", "-".repeat(103));
                for g in guests {
                    println!(
                        "{:<38} {:<20} {:<14} {:<6} {:>12} {:<8}",
                        g.id,
                        truncate(&g.guest_name, 20),
                        g.mobile_number,
                        g.seat_number,
                        format_cents(g.paid_amount),
                        g.payment_status
                    );
                }
            }
        }

        GuestCommands::Delete { id } => {
            let guest = service.delete_guest(&user.id, &id).await?;
            println!("Deleted guest: {}", guest.guest_name);
        }
    }

    Ok(())
}

async fn run_expense_command(service: &AgencyService, cmd: ExpenseCommands) -> Result<()> {
    let user = service.require_user().await?;

    match cmd {
        ExpenseCommands::Add {
            tour,
            category,
            amount,
            note,
        } => {
            let category: ExpenseCategory = category.parse().map_err(|e| {
                anyhow::anyhow!("{}. Valid categories: transport, hotel, food, guide, other", e)
            })?;
            let amount_cents =
                parse_cents(&amount).context("Invalid amount format. Use '500.00' or '500'")?;

            let expense = service
                .add_expense(&user.id, &tour, category, amount_cents, note)
                .await?;

            println!(
                "Recorded expense: {} {} ({})",
                expense.category,
                format_cents(expense.amount),
                expense.id
            );
        }

        ExpenseCommands::List { tour } => {
            let expenses = service.list_expenses(&user.id, &tour).await?;
            if expenses.is_empty() {
                println!("No expenses recorded.");
            } else {
                println!("{:<38} {:<10} {:>12} NOTE", "ID", "CATEGORY", "AMOUNT");
                println!("{}", "-".repeat(75));
                for e in expenses {
                    println!(
                        "{:<38} {:<10} {:>12} {}",
                        e.id,
                        e.category,
                        format_cents(e.amount),
                        truncate(&e.note, 30)
                    );
                }
            }
        }

        ExpenseCommands::Delete { id } => {
            let expense = service.delete_expense(&user.id, &id).await?;
            println!(
                "Deleted expense: {} {}",
                expense.category,
                format_cents(expense.amount)
            );
        }
    }

    Ok(())
}

fn print_tours(tours: &[Tour]) {
    if tours.is_empty() {
        println!("No tours found.");
        return;
    }

    println!(
        "{:<37} {:<24} {:<10} {:<16} {:>5} {:>12}",
        "ID", "NAME", "DATE", "HOST", "SEATS", "PRICE"
    );
    println!("{}", "-".repeat(109));
    for tour in tours {
        println!(
            "{:<37} {:<24} {:<10} {:<16} {:>5} {:>12}",
            tour.id,
            truncate(&tour.tour_name, 24),
            tour.tour_date,
            truncate(&tour.host_name, 16),
            tour.total_seats,
            format_cents(tour.price_per_seat)
        );
    }
}

fn print_tour_summary(summary: &TourSummary) {
    let tour = &summary.tour;
    let f = &summary.financials;

    println!("Tour: {}", tour.tour_name);
    println!("  ID:          {}", tour.id);
    println!("  Date:        {}", tour.tour_date);
    if !tour.host_name.is_empty() {
        println!("  Host:        {}", tour.host_name);
    }
    println!("  Seat price:  {}", format_cents(tour.price_per_seat));
    println!(
        "  Booked:      {}/{} ({:.0}%)",
        summary.guest_count, tour.total_seats, summary.seat_occupancy
    );
    println!();
    println!("Collected:          {:>15}", format_cents(f.total_collected));
    println!("Unpaid:             {:>15}", format_cents(f.total_unpaid));
    println!("Projected revenue:  {:>15}", format_cents(f.projected_revenue));
    println!("Expenses:           {:>15}", format_cents(f.total_expenses));
    println!("{}", "-".repeat(35));
    println!("Current profit:     {:>15}", format_cents(f.current_net_profit));
    println!("Projected profit:   {:>15}", format_cents(f.projected_net_profit));
    println!("Avg per guest:      {:>15}", format_cents(summary.average_collection));

    if !summary.dues.is_empty() {
        println!();
        println!(
            "{:<20} {:<6} {:>12} {:>12} {:>6} {:<8}",
            "GUEST", "SEAT", "PAID", "DUE", "PAID%", "STATUS"
        );
        println!("{}", "-".repeat(69));
        for due in &summary.dues {
            println!(
                "{:<20} {:<6} {:>12} {:>12} {:>5.0}% {:<8}",
                truncate(&due.guest_name, 20),
                due.seat_number,
                format_cents(due.paid),
                format_cents(due.due),
                due.paid_percentage,
                due.payment_status
            );
        }
        println!();
        println!("{}", outstanding_line(summary));
    }
}

fn outstanding_line(summary: &TourSummary) -> String {
    let (count, owed) = summary
        .outstanding()
        .fold((0, 0), |(count, owed): (usize, Cents), due| {
            (count + 1, owed.saturating_add(due.due))
        });
    if count == 0 {
        "All guests have paid in full.".to_string()
    } else {
        format!("{} guest(s) still owe {}", count, format_cents(owed))
    }
}

fn print_range_report(report: &RangeReport) {
    let stats = &report.stats.stats;
    let bound = |d: Option<NaiveDate>| d.map(|d| d.to_string()).unwrap_or_else(|| "-".into());

    println!("Tour Report");
    println!(
        "Period: {} to {}",
        bound(report.range.start),
        bound(report.range.end)
    );
    println!();
    println!("Tours conducted: {:>15}", stats.total_tours);
    println!("Guests managed:  {:>15}", report.stats.guest_count);
    println!("Total revenue:   {:>15}", format_cents(stats.total_income));
    println!("Total expenses:  {:>15}", format_cents(stats.total_expenses));
    println!("Net profit:      {:>15}", format_cents(stats.net_profit));

    if report.lines.is_empty() {
        println!();
        println!("No tours in this period.");
        return;
    }

    println!();
    println!(
        "{:<24} {:<10} {:>6} {:>12} {:>12} {:>12}",
        "TOUR", "DATE", "GUESTS", "INCOME", "EXPENSES", "PROFIT"
    );
    println!("{}", "-".repeat(81));
    for line in &report.lines {
        println!(
            "{:<24} {:<10} {:>6} {:>12} {:>12} {:>12}",
            truncate(&line.tour_name, 24),
            line.tour_date,
            line.guest_count,
            format_cents(line.income),
            format_cents(line.expenses),
            format_cents(line.profit)
        );
    }
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

fn parse_date(date_str: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date_str, "%Y-%m-%d")
        .with_context(|| format!("Invalid date '{}'. Use YYYY-MM-DD", date_str))
}

fn parse_optional_date(date_str: Option<String>) -> Result<Option<NaiveDate>> {
    date_str.as_deref().map(parse_date).transpose()
}

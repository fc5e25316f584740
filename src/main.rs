use crate::options::{Args, Command, Range};
use anyhow::Context;
use clap::Parser;
use receipts::catalog::Catalog;
use receipts::query::DateRange;
use receipts::{aggregate, DirectorySource, LineItemRecord, Store};
use time::Date;

mod options {
    use receipts::query::parse_date;
    use std::path::PathBuf;
    use time::Date;

    #[derive(Debug, clap::Parser)]
    #[clap(name = "receipts", about = "Sales analytics over daily point-of-sale exports")]
    pub struct Args {
        /// The directory holding one `YYYYMMDD.csv` export per business day.
        #[clap(long, short = 'd', default_value = "receipts_csv")]
        pub data_dir: PathBuf,
        /// A RON file with the product catalog, mapping products to categories.
        #[clap(long, short = 'c')]
        pub catalog: Option<PathBuf>,
        /// The first day to look for exports, as YYYY-MM-DD.
        #[clap(long, value_parser = parse_date)]
        pub since: Option<Date>,
        /// The last day to look for exports, today if unset.
        #[clap(long, value_parser = parse_date)]
        pub until: Option<Date>,
        /// Log more, repeat for even more.
        #[clap(long, short = 'v', action = clap::ArgAction::Count)]
        pub verbose: u8,
        #[clap(subcommand)]
        pub command: Command,
    }

    /// Limit a command to the business days between two dates, or use all of them if unset.
    #[derive(Debug, clap::Args)]
    pub struct Range {
        #[clap(long, value_parser = parse_date)]
        pub from: Option<Date>,
        #[clap(long, value_parser = parse_date)]
        pub to: Option<Date>,
    }

    #[derive(Debug, clap::Subcommand)]
    pub enum Command {
        /// List all days an export exists for.
        Days {
            /// Only list the last N business days.
            #[clap(long)]
            recent: Option<usize>,
        },
        /// Print the normalized records.
        Records(Range),
        /// List all products ever sold.
        Products {
            /// Group the products by the category the catalog assigns to them.
            #[clap(long)]
            by_category: bool,
        },
        /// The total sales per business day along with a 3-day moving average.
        Trend(Range),
        /// The average sales per day of the week.
        Weekdays(Range),
        /// The best selling products by amount.
        Top {
            #[clap(short = 'n', default_value = "5")]
            n: usize,
            #[clap(flatten)]
            range: Range,
        },
        /// The sales per category and their share in all sales.
        Categories(Range),
        /// Total, average, highest and lowest daily sales.
        Summary(Range),
        /// One series per product over all business days, for comparison.
        Compare {
            #[clap(long = "product", short = 'p', required = true)]
            products: Vec<String>,
            #[clap(flatten)]
            range: Range,
        },
        /// Sales of a single product, split by combo and à la carte.
        Product {
            #[clap(long, short = 'p')]
            product: String,
            #[clap(flatten)]
            range: Range,
        },
    }
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let catalog = args
        .catalog
        .as_ref()
        .map(|path| {
            Catalog::from_path(path)
                .with_context(|| format!("Could not load catalog at '{}'", path.display()))
        })
        .transpose()?
        .unwrap_or_default();
    let defaults = receipts::store::Options::default();
    let mut store = Store::new(
        DirectorySource::new(&args.data_dir),
        receipts::store::Options {
            dataset_start: args.since.unwrap_or(defaults.dataset_start),
            until: args.until,
        },
    );
    let mut out = csv::Writer::from_writer(std::io::BufWriter::new(std::io::stdout()));

    match args.command {
        Command::Days { recent } => {
            let days = match recent {
                Some(count) => store.recent_business_days(count),
                None => store.business_days(),
            };
            out.write_record(["date"])?;
            for day in days {
                out.write_record([slash(*day)?])?;
            }
        }
        Command::Records(range) => {
            for record in records(&mut store, &range)? {
                out.serialize(record)?;
            }
        }
        Command::Products { by_category } => {
            let products = store.all_canonical_products();
            if by_category {
                let groups = catalog.group_products(products.iter().map(String::as_str));
                out.write_record(["category", "product"])?;
                for (category, products) in &groups.by_category {
                    for product in products {
                        out.write_record([category, product])?;
                    }
                }
                for product in &groups.unclassified {
                    out.write_record(["", product.as_str()])?;
                }
            } else {
                out.write_record(["product"])?;
                for product in products {
                    out.write_record([product])?;
                }
            }
        }
        Command::Trend(range) => {
            for point in aggregate::daily_trend(&records(&mut store, &range)?) {
                out.serialize(point)?;
            }
        }
        Command::Weekdays(range) => {
            for weekday in aggregate::weekday_averages(&records(&mut store, &range)?) {
                out.serialize(weekday)?;
            }
        }
        Command::Top { n, range } => {
            for product in aggregate::top_products(&records(&mut store, &range)?, n) {
                out.serialize(product)?;
            }
        }
        Command::Categories(range) => {
            for share in aggregate::category_shares(&records(&mut store, &range)?) {
                out.serialize(share)?;
            }
        }
        Command::Summary(range) => {
            let summary = aggregate::sales_summary(&records(&mut store, &range)?);
            out.write_record([
                "total",
                "days",
                "average",
                "highest_date",
                "highest_amount",
                "lowest_date",
                "lowest_amount",
            ])?;
            let day = |day: Option<aggregate::DailyTotal>| -> anyhow::Result<[String; 2]> {
                Ok(match day {
                    Some(day) => [slash(day.date)?, day.amount.to_string()],
                    None => Default::default(),
                })
            };
            let [highest_date, highest_amount] = day(summary.highest)?;
            let [lowest_date, lowest_amount] = day(summary.lowest)?;
            out.write_record([
                summary.total.to_string(),
                summary.days.to_string(),
                format!("{:.0}", summary.average),
                highest_date,
                highest_amount,
                lowest_date,
                lowest_amount,
            ])?;
        }
        Command::Compare { products, range } => {
            let series =
                aggregate::product_series(&records(&mut store, &range)?, &products, &catalog);
            let mut header = vec!["date".to_owned()];
            header.extend(products.iter().cloned());
            out.write_record(&header)?;
            for point in series {
                let mut row = vec![slash(point.date)?];
                row.extend(products.iter().map(|product| {
                    point
                        .values
                        .get(product)
                        .copied()
                        .unwrap_or_default()
                        .to_string()
                }));
                out.write_record(&row)?;
            }
        }
        Command::Product { product, range } => {
            out.serialize(aggregate::product_summary(
                &records(&mut store, &range)?,
                &product,
            ))?;
        }
    }
    out.flush()?;
    Ok(())
}

/// Return the records within `range`, or all of them if it is unbounded.
fn records(
    store: &mut Store<DirectorySource>,
    Range { from, to }: &Range,
) -> anyhow::Result<Vec<LineItemRecord>> {
    if from.is_none() && to.is_none() {
        return Ok(store.load_all().to_vec());
    }
    let options = store.options();
    let range = DateRange::new(
        from.unwrap_or(options.dataset_start),
        to.or(options.until)
            .unwrap_or_else(|| time::OffsetDateTime::now_utc().date()),
    )?;
    let records = store.get_by_date_range(range);
    if records.is_empty() {
        tracing::warn!(from = %range.start(), to = %range.end(), "No sales data within range");
    }
    Ok(records)
}

fn slash(date: Date) -> anyhow::Result<String> {
    Ok(date.format(time::macros::format_description!("[year]/[month]/[day]"))?)
}

fn init_tracing(verbose: u8) {
    use tracing_subscriber::EnvFilter;
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

use chrono::NaiveDate;
use ecom_analytics::{Aggregator, DashboardReport, LoadError, TableStore, DEFAULT_TOP_SELLERS};
use tempfile::TempDir;

const FACTS: &str = "\
order_id,order_item_id,product_id,seller_id,customer_id,product_category_name,product_category_name_english,payment_type,customer_state,seller_state,seller_zip_code_prefix,seller_city,price,order_approved_at,order_purchase_timestamp,shipping_limit_date
o5,1,p5,S3,c4,cama_mesa_banho,bed_bath_table,voucher,RJ,MG,30140,belo horizonte,40.00,2018-01-05 12:00:00,2018-01-05 10:00:00,2018-01-09 12:00:00
o1,1,p1,S1,c1,brinquedos,toys,credit_card,SP,SP,13023,campinas,10.00,2018-01-01 09:15:00,2018-01-01 09:00:00,2018-01-04 09:15:00
o1,2,p2,S1,c1,brinquedos,toys,credit_card,SP,SP,13023,campinas,5.00,2018-01-01 09:15:00,2018-01-01 09:00:00,2018-01-04 09:15:00
o2,1,p3,S2,c2,livros,books,boleto,RJ,SP,01037,sao paulo,20.00,2018-01-01 17:40:00,2018-01-01 17:00:00,not-a-date
o3,1,p1,S1,c3,brinquedos,toys,credit_card,SP,SP,13023,campinas,10.00,2018-01-03 11:00:00,2018-01-03 10:30:00,2018-01-06 11:00:00
o4,1,p4,S4,c2,livros,books,credit_card,RJ,,,,7.50,,2018-01-04 08:00:00,
";

const CUSTOMER_GEO: &str = "\
geolocation_zip_code_prefix,geolocation_lat,geolocation_lng,geolocation_city,geolocation_state,customer_id
01037,-23.545,-46.639,sao paulo,SP,c1
01037,-23.546,-46.640,sao paulo,SP,c1
22041,-22.970,-43.186,rio de janeiro,RJ,c2
";

const SELLER_GEO: &str = "\
geolocation_zip_code_prefix,geolocation_lat,geolocation_lng,geolocation_city,geolocation_state,seller_id
13023,-22.898,-47.063,campinas,SP,S1
01037,-23.545,-46.639,sao paulo,SP,S2
";

struct Fixture {
    _dir: TempDir,
    facts: PathBuf,
    customers: PathBuf,
    sellers: PathBuf,
}

fn fixture() -> Fixture {
    let dir = TempDir::new().unwrap();
    let facts = dir.path().join("all_data.csv");
    let customers = dir.path().join("geolocation_customer.csv");
    let sellers = dir.path().join("geolocation_seller.csv");
    fs::write(&facts, FACTS).unwrap();
    fs::write(&customers, CUSTOMER_GEO).unwrap();
    fs::write(&sellers, SELLER_GEO).unwrap();
    Fixture {
        _dir: dir,
        facts,
        customers,
        sellers,
    }
}

fn date(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2018, 1, d).unwrap()
}

#[test]
fn test_load_filter_aggregate() {
    let fx = fixture();
    let store = TableStore::load(&fx.facts, &fx.customers, &fx.sellers).unwrap();
    assert_eq!(store.facts().len(), 6);

    let view = store.filter_by_date(date(1), date(3)).unwrap();
    assert_eq!(view.len(), 4);
    let full: Vec<*const _> = store.facts().iter().map(std::ptr::from_ref).collect();
    for fact in view.iter() {
        assert!(full.contains(&std::ptr::from_ref(fact)));
        let d = fact.approval_date().unwrap();
        assert!(date(1) <= d && d <= date(3));
    }

    let agg = Aggregator::new(view);

    let daily = agg.daily_orders();
    assert_eq!(daily.len(), 2);
    assert_eq!(daily[0].order_date, date(1));
    assert_eq!(daily[0].order_count, 2);
    // o1 item 1: 10 * 1, o1 item 2: 5 * 2, o2: 20 * 1
    assert!((daily[0].revenue - 40.0).abs() < 1e-9);
    assert_eq!(daily[1].order_count, 1);

    let distinct_orders: HashSet<_> = agg.view().iter().filter_map(|f| f.order_id.as_deref()).collect();
    assert_eq!(daily.iter().map(|d| d.order_count).sum::<usize>(), distinct_orders.len());

    let categories = agg.order_items_by_category();
    assert_eq!(categories[0].category, "toys");
    assert_eq!(categories[0].product_count, 3);
    assert_eq!(categories.iter().map(|c| c.product_count).sum::<usize>(), agg.view().len());
    assert!(categories.windows(2).all(|w| w[0].product_count >= w[1].product_count));

    let payments = agg.payment_type_breakdown();
    assert_eq!(payments[0].payment_type, "credit_card");
    assert_eq!(payments[0].count, 3);

    let customers = agg.customers_by_state();
    assert_eq!(customers.mode_state.as_deref(), Some("SP"));
    let distinct_customers: HashSet<_> = agg.view().iter().filter_map(|f| f.customer_id.as_deref()).collect();
    let summed: usize = customers.rows.iter().map(|r| r.customer_count).sum();
    assert!(summed <= distinct_customers.len());

    let sellers = agg.sellers_by_state();
    assert_eq!(sellers.rows.len(), 1);
    assert_eq!(sellers.rows[0].seller_count, 2);
}

#[test]
fn test_report_over_full_range() {
    let fx = fixture();
    let store = TableStore::load(&fx.facts, &fx.customers, &fx.sellers).unwrap();
    let range = store.date_bounds().unwrap();
    assert_eq!(range.start(), date(1));
    assert_eq!(range.end(), date(5));

    let agg = Aggregator::new(store.filter_by_range(range).unwrap());
    let report = DashboardReport::generate(&agg, Some(range), DEFAULT_TOP_SELLERS);

    assert_eq!(report.row_count, 5);
    assert_eq!(report.top_sellers[0].seller_id, "S1");
    assert_eq!(report.top_sellers[0].product_count, 3);
    assert_eq!(report.top_sellers[0].seller_city.as_deref(), Some("campinas"));
    assert_eq!(report.top_sellers[1].seller_zip_code_prefix.as_deref(), Some("01037"));

    let json = report.to_json().unwrap();
    let parsed: DashboardReport = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.top_sellers, report.top_sellers);
}

#[test]
fn test_geolocation_dedup() {
    let fx = fixture();
    let store = TableStore::load(&fx.facts, &fx.customers, &fx.sellers).unwrap();

    let customers = store.customer_geo().unique_points();
    assert_eq!(customers.len(), 2);
    assert!((customers[0].latitude - -23.545).abs() < 1e-9);
    assert_eq!(customers[0].zip_code_prefix.as_deref(), Some("01037"));

    assert_eq!(store.seller_geo().unique_points().len(), 2);
}

#[test]
fn test_missing_geo_file() {
    let fx = fixture();
    let err = TableStore::load(&fx.facts, fx.customers.with_extension("missing"), &fx.sellers).unwrap_err();
    assert!(matches!(err, LoadError::NotFound { .. }));
}

pub mod listed_products_seed;

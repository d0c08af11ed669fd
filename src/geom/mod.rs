pub mod ellipse;

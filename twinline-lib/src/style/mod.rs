pub mod baseline;
pub mod css_matcher;
pub mod owned_css;
pub mod resolver;
pub mod stylesheet;

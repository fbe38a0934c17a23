mod string;
#[cfg(test)]
mod tests;
mod two_pass;

pub use string::VxStr;

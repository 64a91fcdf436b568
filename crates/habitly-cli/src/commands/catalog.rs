use habitly_core::catalog::templates;

use super::print_json;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    print_json(templates())
}

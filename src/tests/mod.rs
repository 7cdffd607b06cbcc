mod test_rotation_properties;
mod test_chain_scenarios;

pub const NAME_SYSTEM_PROMPT: &str = "You are an expert at creating unique, sophisticated restaurant names. \
Your names should be memorable, culturally appropriate, and elegant.";

pub const NAME_HUMAN_PROMPT: &str = "Name of the country is {country}. \
Provide ONLY a single name for the restaurant, with no explanation or additional text.";

pub const MENU_SYSTEM_PROMPT: &str = "You are an expert at creating unique, sophisticated food item menu lists. \
Your names should be memorable, culturally appropriate, and elegant with the given restaurant name.";

pub const MENU_HUMAN_PROMPT: &str = "Name of the restaurant is {restaurant_name}. \
Provide ONLY a comma separated list of fancy food item names for the restaurant menu, \
with no explanation or additional text.";

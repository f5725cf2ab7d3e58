mod names;
mod outage;
